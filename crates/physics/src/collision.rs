//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (floors, walls, ledges)
    Environment = 1 << 0,
    /// Player character capsule
    Player = 1 << 1,
}

impl CollisionGroup {
    /// Membership/filter pair for environment geometry.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Membership/filter pair for the player capsule.
    pub fn player() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Player as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32);
        (membership, filter)
    }
}

/// Interaction groups for environment colliders.
pub(crate) fn env_interaction_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::environment();
    InteractionGroups::new(membership, filter)
}

/// Interaction groups for the player capsule collider.
pub(crate) fn player_interaction_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::player();
    InteractionGroups::new(membership, filter)
}
