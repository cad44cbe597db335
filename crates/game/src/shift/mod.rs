//! The shift ability: a short-range traversal teleport.
//!
//! Priming (button press) validates a destination through the probe
//! pipeline; execution (button release) consumes the candidate and starts
//! the timed transition. A resource pool and two cooldown thresholds gate
//! the whole thing.

pub mod ledger;
pub mod probe;
pub mod transition;

pub use ledger::AbilityLedger;
pub use probe::{
    resolve_destination, GeometryProbes, ProbeContext, ProbeFlags, ShiftCandidate, SurfaceHit,
    WorldProbes,
};
pub use transition::{FovReturn, ShiftTransition, TransitionFrame};

use crate::body::CharacterBody;
use crate::camera::Camera;
use crate::config::ShiftTuning;
use crate::debug::DebugDraw;
use crate::effects::EffectMarkers;
use engine_core::Vec3;
use physics::PhysicsWorld;

pub struct ShiftAbility {
    pub ledger: AbilityLedger,
    candidate: Option<ShiftCandidate>,
    transition: Option<ShiftTransition>,
    fov_return: Option<FovReturn>,
    /// FOV to return to after a shift, cached at startup.
    base_fov: f32,
    duration: f32,
    fov_peak: f32,
    probe_distance: f32,
    retarget_offset: f32,
}

impl ShiftAbility {
    pub fn new(tuning: &ShiftTuning, base_fov: f32) -> Self {
        Self {
            ledger: AbilityLedger::new(tuning),
            candidate: None,
            transition: None,
            fov_return: None,
            base_fov,
            duration: tuning.duration,
            fov_peak: tuning.fov_peak,
            probe_distance: tuning.probe_distance,
            retarget_offset: tuning.retarget_offset,
        }
    }

    /// Whether a transition is currently animating.
    pub fn in_flight(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether a validated destination is stored.
    pub fn can_shift(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn candidate_destination(&self) -> Option<Vec3> {
        self.candidate.map(|c| c.destination)
    }

    pub fn probe_distance(&self) -> f32 {
        self.probe_distance
    }

    /// Advance the ledger's clock. Separate from [`Self::tick`] so it can
    /// run first in the frame, before any movement writes.
    pub fn tick_ledger(&mut self, dt: f32) {
        let in_flight = self.transition.is_some();
        self.ledger.tick(dt, in_flight);
    }

    /// Prime the ability: validate a destination for the current view. Any
    /// previous candidate is replaced. On a cooldown gate or a fully blocked
    /// pipeline no candidate (and no marker) remains.
    pub fn prime(
        &mut self,
        probes: &dyn GeometryProbes,
        debug: &mut dyn DebugDraw,
        ctx: &ProbeContext,
        effects: &mut EffectMarkers,
    ) {
        if !self.ledger.can_prime() {
            self.candidate = None;
            return;
        }

        effects.spawn_marker(ctx.eye);
        self.candidate = resolve_destination(probes, debug, ctx);
        match self.candidate {
            Some(c) => {
                effects.set_marker_position(c.destination);
                log::debug!("shift primed to {:?}", c.destination);
            }
            None => {
                effects.clear_marker();
                log::debug!("shift priming found no destination");
            }
        }
    }

    /// Rewrite the stored destination to a fixed forward offset. Does not
    /// validate; does nothing without an existing candidate.
    pub fn retarget(&mut self, eye: Vec3, look: Vec3) {
        if let Some(c) = &mut self.candidate {
            c.destination = eye + look * self.retarget_offset;
            log::debug!("shift retargeted to {:?}", c.destination);
        }
    }

    /// Fire the shift. No-ops (returning false) while a transition is in
    /// flight, without a candidate, or when the pool cannot cover the cost.
    pub fn execute(&mut self, origin: Vec3, effects: &mut EffectMarkers) -> bool {
        effects.clear_marker();

        if self.transition.is_some() || self.candidate.is_none() {
            return false;
        }
        if !self.ledger.try_spend() {
            return false;
        }

        let destination = self.candidate.take().unwrap().destination;
        log::info!("shift: {:?} -> {:?}", origin, destination);
        self.transition = Some(ShiftTransition::new(
            origin,
            destination,
            self.duration,
            self.base_fov,
            self.fov_peak,
        ));
        true
    }

    /// Per-frame transition and FOV-return updates. Runs after the movement
    /// writes so the transition's position wins the frame.
    pub fn tick(
        &mut self,
        dt: f32,
        camera: &mut Camera,
        body: &mut CharacterBody,
        world: &mut PhysicsWorld,
    ) {
        if let Some(t) = self.transition.as_mut() {
            let frame = t.advance(dt);
            body.set_position(world, frame.position);
            camera.fov_degrees = frame.fov;
            if frame.finished {
                self.transition = None;
                self.fov_return =
                    Some(FovReturn::new(frame.fov, self.base_fov, self.duration * 2.0));
            }
        } else if let Some(r) = self.fov_return.as_mut() {
            let (fov, finished) = r.advance(dt);
            camera.fov_degrees = fov;
            if finished {
                self.fov_return = None;
            }
        }
    }
}
