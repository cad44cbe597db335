//! Effect marker actors for the shift ability.
//!
//! While the ability is primed a single marker entity exists in the effect
//! world; it disappears when the shift fires or the priming is dropped. The
//! marker's absence is the player-visible signal that no legal destination
//! was found.

use engine_core::Transform;
use glam::Vec3;
use hecs::{Entity, World};

/// Kinds of effect actors this controller spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    ShiftMarker,
}

/// Owns the effect world and the at-most-one shift marker inside it.
pub struct EffectMarkers {
    world: World,
    marker: Option<Entity>,
}

impl Default for EffectMarkers {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectMarkers {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            marker: None,
        }
    }

    /// Spawn the shift marker if it is not already present.
    pub fn spawn_marker(&mut self, position: Vec3) {
        if self.marker.is_none() {
            let entity = self
                .world
                .spawn((Transform::from_position(position), EffectKind::ShiftMarker));
            self.marker = Some(entity);
            log::debug!("spawned shift marker at {:?}", position);
        }
    }

    /// Move the marker to a new position (the validated destination).
    pub fn set_marker_position(&mut self, position: Vec3) {
        if let Some(entity) = self.marker {
            if let Ok(mut t) = self.world.get::<&mut Transform>(entity) {
                t.position = position;
            }
        }
    }

    /// Despawn the marker if present.
    pub fn clear_marker(&mut self) {
        if let Some(entity) = self.marker.take() {
            let _ = self.world.despawn(entity);
            log::debug!("cleared shift marker");
        }
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// Current marker position, if a marker exists.
    pub fn marker_position(&self) -> Option<Vec3> {
        let entity = self.marker?;
        self.world
            .get::<&Transform>(entity)
            .ok()
            .map(|t| t.position)
    }
}
