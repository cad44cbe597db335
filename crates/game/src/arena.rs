//! Static test environments for the movement sandbox.

use engine_core::Vec3;
use physics::PhysicsWorld;

/// A physics world populated with traversal test geometry.
pub struct Arena {
    pub physics: PhysicsWorld,
}

impl Arena {
    /// The default range: flat ground, a low climbable wall, and a tall
    /// barrier, spread across lanes so each can be probed in isolation.
    ///
    /// - lane x = 0: wall 180 high at z = -500 with open air above it
    /// - lane x = 600: barrier 800 high at z = -500
    /// - lane x = -600: open ground
    pub fn test_range() -> Self {
        let mut physics = PhysicsWorld::new();

        let ground = physics.add_static_body(Vec3::new(0.0, -50.0, 0.0));
        physics.add_box_collider(ground, Vec3::new(6000.0, 50.0, 6000.0));

        let wall = physics.add_static_body(Vec3::new(0.0, 90.0, -500.0));
        physics.add_box_collider(wall, Vec3::new(300.0, 90.0, 20.0));

        let barrier = physics.add_static_body(Vec3::new(600.0, 400.0, -500.0));
        physics.add_box_collider(barrier, Vec3::new(200.0, 400.0, 20.0));

        physics.update_query_pipeline();
        Self { physics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::NullDraw;
    use crate::shift::{resolve_destination, ProbeContext, WorldProbes};

    fn ctx_at(eye: Vec3, look: Vec3) -> ProbeContext {
        ProbeContext {
            eye,
            look,
            body_forward: Vec3::new(look.x, 0.0, look.z).normalize_or_zero(),
            capsule_radius: 34.0,
            capsule_half_height: 88.0,
            probe_distance: 800.0,
        }
    }

    #[test]
    fn low_wall_resolves_to_ledge_perch() {
        let arena = Arena::test_range();
        let probes = WorldProbes::new(&arena.physics, None);
        let ctx = ctx_at(Vec3::new(0.0, 152.0, 0.0), Vec3::NEG_Z);

        let c = resolve_destination(&probes, &mut NullDraw, &ctx).unwrap();
        // Wall top is at 180; the perch is a half-height above the ledge
        // surface, just past the wall face.
        assert!((c.destination.y - 268.0).abs() < 0.5, "got {:?}", c.destination);
        assert!((c.destination.z - -514.0).abs() < 0.5);
    }

    #[test]
    fn tall_barrier_resolves_to_its_base() {
        let arena = Arena::test_range();
        let probes = WorldProbes::new(&arena.physics, None);
        let ctx = ctx_at(Vec3::new(600.0, 152.0, 0.0), Vec3::NEG_Z);

        let c = resolve_destination(&probes, &mut NullDraw, &ctx).unwrap();
        // No climbable top within reach: half a capsule off the wall face,
        // one unit up.
        assert!((c.destination.z - -436.0).abs() < 0.5, "got {:?}", c.destination);
        assert!((c.destination.y - 153.0).abs() < 0.5);
    }

    #[test]
    fn floor_hit_resolves_above_the_ground() {
        let arena = Arena::test_range();
        let probes = WorldProbes::new(&arena.physics, None);
        let look = Vec3::new(0.0, -1.0, -1.0).normalize();
        let ctx = ctx_at(Vec3::new(-600.0, 152.0, 0.0), look);

        let c = resolve_destination(&probes, &mut NullDraw, &ctx).unwrap();
        // Full half-height along the floor normal plus the one-unit nudge
        assert!((c.destination.y - 89.0).abs() < 0.5, "got {:?}", c.destination);
        assert!((c.destination.x - -600.0).abs() < 0.5);
    }

    #[test]
    fn open_lane_reaches_full_probe_distance() {
        let arena = Arena::test_range();
        let probes = WorldProbes::new(&arena.physics, None);
        let ctx = ctx_at(Vec3::new(-600.0, 152.0, 0.0), Vec3::Z);

        let c = resolve_destination(&probes, &mut NullDraw, &ctx).unwrap();
        assert!((c.destination - Vec3::new(-600.0, 152.0, 800.0)).length() < 0.5);
    }
}
