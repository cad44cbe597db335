//! Shift destination validation: the staged geometry probe pipeline.
//!
//! Priming the ability runs this once. A forward ray classifies what is in
//! front of the camera; depending on the answer a handful of follow-up
//! sweeps decide where a capsule could legally stand. Every stage records
//! one bit in [`ProbeFlags`]; only the fully-set nibble rejects the priming.
//!
//! All probes go through [`GeometryProbes`], so the pipeline unit-tests
//! against a scripted fake and runs against the rapier world in game.

use crate::debug::DebugDraw;
use engine_core::Vec3;
use physics::PhysicsWorld;
use rapier3d::prelude::ColliderHandle;

/// A surface found by a probe.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// World position of the hit (shape center for sweeps).
    pub point: Vec3,
    /// Surface normal at the hit.
    pub normal: Vec3,
}

/// Geometry queries the validator needs. All synchronous, bounded, and free
/// of side effects.
pub trait GeometryProbes {
    fn raycast(&self, origin: Vec3, end: Vec3) -> Option<SurfaceHit>;
    fn sweep_capsule(&self, start: Vec3, end: Vec3, radius: f32, half_height: f32)
        -> Option<SurfaceHit>;
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit>;
}

/// Outcome bits of the probe stages, in pipeline order. The meaning of bits
/// 1–3 depends on which branch ran; the indices and the rejection rule do
/// not: all four set means no legal placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeFlags(u8);

impl ProbeFlags {
    pub fn mark(&mut self, index: u8) {
        self.0 |= 1 << index;
    }

    pub fn is_marked(&self, index: u8) -> bool {
        self.0 & (1 << index) != 0
    }

    /// True when every stage reported a blocker.
    pub fn rejects(&self) -> bool {
        self.0 & 0b1111 == 0b1111
    }
}

/// Geometry inputs for one validation run.
#[derive(Debug, Clone, Copy)]
pub struct ProbeContext {
    /// Camera position.
    pub eye: Vec3,
    /// Camera forward (full 3D look direction).
    pub look: Vec3,
    /// Actor forward on the horizontal plane (yaw only).
    pub body_forward: Vec3,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
    /// Forward probe length.
    pub probe_distance: f32,
}

/// A validated shift destination. Produced by priming, consumed at most once
/// by execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftCandidate {
    pub destination: Vec3,
}

/// Run the probe pipeline. Returns the candidate, or `None` when every stage
/// came back blocked.
pub fn resolve_destination(
    probes: &dyn GeometryProbes,
    debug: &mut dyn DebugDraw,
    ctx: &ProbeContext,
) -> Option<ShiftCandidate> {
    let mut flags = ProbeFlags::default();
    let start = ctx.eye;
    let far_end = ctx.eye + ctx.look * ctx.probe_distance;
    let radius = ctx.capsule_radius;
    let half_height = ctx.capsule_half_height;

    debug.line(start, far_end, "forward");

    let forward_hit = probes.raycast(start, far_end);
    if forward_hit.is_some() {
        flags.mark(0);
    }

    let destination = if let Some(hit) = forward_hit {
        debug.sphere(hit.point, 10.0, "impact");

        // A surface whose normal has no horizontal component is a floor;
        // anything else is treated as a wall.
        let floor_like =
            hit.normal.x.abs() < f32::EPSILON && hit.normal.z.abs() < f32::EPSILON;

        let mut override_destination = None;

        if !floor_like {
            // Ledge scan: drop a short ray just past the wall contact. If it
            // finds a top surface with headroom, perching on the ledge beats
            // any placement against the wall face.
            let scan_base = hit.point + ctx.body_forward * radius;
            let scan_top = scan_base + Vec3::Y * (half_height / 2.0);
            debug.line(scan_top, scan_base, "ledge scan");

            if let Some(ledge) = probes.raycast(scan_top, scan_base) {
                let perch = ledge.point + Vec3::Y * half_height;
                let headroom_top = ledge.point + Vec3::Y * (half_height * 2.0);
                if probes.sweep_sphere(perch, headroom_top, radius).is_some() {
                    flags.mark(1);
                } else {
                    debug.sphere(perch, radius, "perch");
                    override_destination = Some(perch);
                }
            }
        }

        // Base candidate: back off the hit surface along its normal, using the
        // full half-height for floors and half of it for walls, nudged one
        // unit up.
        let normal_reach = half_height / if floor_like { 1.0 } else { 2.0 };
        let candidate = hit.point + hit.normal * normal_reach + Vec3::Y;
        debug.sphere(candidate, radius, "candidate");

        if probes
            .sweep_capsule(candidate, candidate, radius, half_height)
            .is_some()
        {
            flags.mark(2);
            // The candidate clips geometry; check for open space above it.
            let clearance_from = candidate + Vec3::Y * (half_height * 0.25);
            let clearance_to = candidate + Vec3::Y * (half_height * 1.75);
            if probes
                .sweep_sphere(clearance_from, clearance_to, radius)
                .is_some()
            {
                flags.mark(3);
            }
        }

        if flags.is_marked(2) && (flags.is_marked(1) || flags.is_marked(3)) {
            // Clipping with no verified clearance anywhere: settle for where
            // a full-length capsule sweep from the camera stops.
            let stop = probes
                .sweep_capsule(start, far_end, radius, half_height)
                .map(|h| h.point)
                .unwrap_or(far_end);
            debug.sphere(stop, radius, "fallback");
            override_destination = Some(stop);
        }

        override_destination.unwrap_or(candidate)
    } else {
        // Nothing in front: aim for the far end of the probe, checking the
        // capsule actually fits out there.
        debug.sphere(far_end, 10.0, "open end");
        let mut end = far_end;

        if probes
            .sweep_capsule(end, end, radius, half_height)
            .is_some()
        {
            flags.mark(1);
            let clearance_from = end + Vec3::Y * (half_height * 0.5);
            let clearance_to = end + Vec3::Y * (half_height * 2.0);
            if probes
                .sweep_sphere(clearance_from, clearance_to, radius)
                .is_some()
            {
                flags.mark(2);
                if let Some(stop) = probes.sweep_capsule(start, far_end, radius, half_height) {
                    flags.mark(3);
                    end = stop.point;
                }
            }
        }
        end
    };

    if flags.rejects() {
        log::debug!("shift priming rejected, flags {:#06b}", flags.0);
        None
    } else {
        debug.sphere(destination, radius, "destination");
        Some(ShiftCandidate { destination })
    }
}

/// Probe implementation over the rapier world, with the player's own capsule
/// excluded from every query.
pub struct WorldProbes<'a> {
    world: &'a PhysicsWorld,
    exclude: Option<ColliderHandle>,
}

impl<'a> WorldProbes<'a> {
    pub fn new(world: &'a PhysicsWorld, exclude: Option<ColliderHandle>) -> Self {
        Self { world, exclude }
    }
}

impl GeometryProbes for WorldProbes<'_> {
    fn raycast(&self, origin: Vec3, end: Vec3) -> Option<SurfaceHit> {
        self.world.raycast(origin, end, self.exclude).map(|h| SurfaceHit {
            point: h.point,
            normal: h.normal,
        })
    }

    fn sweep_capsule(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        half_height: f32,
    ) -> Option<SurfaceHit> {
        self.world
            .sweep_capsule(start, end, radius, half_height, self.exclude)
            .map(|h| SurfaceHit {
                point: h.point,
                normal: h.normal,
            })
    }

    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit> {
        self.world
            .sweep_sphere(start, end, radius, self.exclude)
            .map(|h| SurfaceHit {
                point: h.point,
                normal: h.normal,
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::debug::NullDraw;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted probe service: each method pops its next scripted answer.
    /// The pipeline's probe order is strict, so scripts are deterministic.
    #[derive(Default)]
    pub struct FakeProbes {
        pub rays: RefCell<VecDeque<Option<SurfaceHit>>>,
        pub capsules: RefCell<VecDeque<Option<SurfaceHit>>>,
        pub spheres: RefCell<VecDeque<Option<SurfaceHit>>>,
    }

    impl FakeProbes {
        pub fn script_ray(&self, hit: Option<SurfaceHit>) {
            self.rays.borrow_mut().push_back(hit);
        }
        pub fn script_capsule(&self, hit: Option<SurfaceHit>) {
            self.capsules.borrow_mut().push_back(hit);
        }
        pub fn script_sphere(&self, hit: Option<SurfaceHit>) {
            self.spheres.borrow_mut().push_back(hit);
        }
    }

    impl GeometryProbes for FakeProbes {
        fn raycast(&self, _origin: Vec3, _end: Vec3) -> Option<SurfaceHit> {
            self.rays.borrow_mut().pop_front().flatten()
        }
        fn sweep_capsule(
            &self,
            _start: Vec3,
            _end: Vec3,
            _radius: f32,
            _half_height: f32,
        ) -> Option<SurfaceHit> {
            self.capsules.borrow_mut().pop_front().flatten()
        }
        fn sweep_sphere(&self, _start: Vec3, _end: Vec3, _radius: f32) -> Option<SurfaceHit> {
            self.spheres.borrow_mut().pop_front().flatten()
        }
    }

    pub fn hit(point: Vec3, normal: Vec3) -> Option<SurfaceHit> {
        Some(SurfaceHit { point, normal })
    }

    fn ctx() -> ProbeContext {
        ProbeContext {
            eye: Vec3::new(0.0, 152.0, 0.0),
            look: Vec3::NEG_Z,
            body_forward: Vec3::NEG_Z,
            capsule_radius: 34.0,
            capsule_half_height: 88.0,
            probe_distance: 800.0,
        }
    }

    #[test]
    fn open_space_targets_probe_end() {
        let probes = FakeProbes::default();
        probes.script_ray(None); // nothing ahead
        probes.script_capsule(None); // far end is clear

        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        assert_eq!(c.destination, Vec3::new(0.0, 152.0, -800.0));
    }

    #[test]
    fn floor_hit_offsets_along_normal_plus_nudge() {
        let probes = FakeProbes::default();
        let point = Vec3::new(0.0, 0.0, -300.0);
        probes.script_ray(hit(point, Vec3::Y));
        probes.script_capsule(None); // candidate does not clip

        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        // Full half-height along the floor normal, plus the one-unit nudge
        assert_eq!(c.destination, point + Vec3::Y * 88.0 + Vec3::Y);
    }

    #[test]
    fn wall_hit_offsets_half_reach() {
        let probes = FakeProbes::default();
        let point = Vec3::new(0.0, 152.0, -500.0);
        let normal = Vec3::Z; // facing the player
        probes.script_ray(hit(point, normal)); // forward ray
        probes.script_ray(None); // ledge scan finds no top surface
        probes.script_capsule(None); // candidate clear

        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        assert_eq!(c.destination, point + normal * 44.0 + Vec3::Y);
    }

    #[test]
    fn climbable_wall_prefers_ledge_perch() {
        let probes = FakeProbes::default();
        let wall_point = Vec3::new(0.0, 152.0, -500.0);
        let ledge_top = Vec3::new(0.0, 180.0, -534.0);
        probes.script_ray(hit(wall_point, Vec3::Z)); // forward ray: wall
        probes.script_ray(hit(ledge_top, Vec3::Y)); // ledge scan: top surface
        probes.script_sphere(None); // headroom above the perch is open
        probes.script_capsule(None); // base candidate clear anyway

        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        assert_eq!(c.destination, ledge_top + Vec3::Y * 88.0);
    }

    #[test]
    fn fully_blocked_wall_rejects() {
        let probes = FakeProbes::default();
        let wall_point = Vec3::new(0.0, 152.0, -500.0);
        probes.script_ray(hit(wall_point, Vec3::Z)); // forward: wall (bit 0)
        probes.script_ray(hit(Vec3::new(0.0, 160.0, -534.0), Vec3::Y)); // ledge surface found
        probes.script_sphere(hit(Vec3::ZERO, Vec3::Y)); // no headroom (bit 1)
        probes.script_capsule(hit(Vec3::ZERO, Vec3::Y)); // candidate clips (bit 2)
        probes.script_sphere(hit(Vec3::ZERO, Vec3::Y)); // no clearance (bit 3)
        probes.script_capsule(hit(Vec3::new(0.0, 152.0, -400.0), Vec3::Z)); // fallback sweep

        assert!(resolve_destination(&probes, &mut NullDraw, &ctx()).is_none());
    }

    #[test]
    fn clipped_floor_candidate_with_clearance_survives() {
        let probes = FakeProbes::default();
        let point = Vec3::new(0.0, 0.0, -300.0);
        probes.script_ray(hit(point, Vec3::Y)); // floor hit (bit 0)
        probes.script_capsule(hit(Vec3::ZERO, Vec3::Y)); // candidate clips (bit 2)
        probes.script_sphere(None); // but clearance above is open

        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        // No override: the base candidate stands
        assert_eq!(c.destination, point + Vec3::Y * 88.0 + Vec3::Y);
    }

    #[test]
    fn clipped_floor_without_clearance_falls_back_to_sweep() {
        let probes = FakeProbes::default();
        let point = Vec3::new(0.0, 0.0, -300.0);
        let sweep_stop = Vec3::new(0.0, 120.0, -180.0);
        probes.script_ray(hit(point, Vec3::Y)); // floor hit (bit 0)
        probes.script_capsule(hit(Vec3::ZERO, Vec3::Y)); // candidate clips (bit 2)
        probes.script_sphere(hit(Vec3::ZERO, Vec3::Y)); // clearance blocked (bit 3)
        probes.script_capsule(hit(sweep_stop, Vec3::Z)); // fallback sweep stop

        // Floor branch never sets bit 1, so this is accepted with the
        // fallback destination.
        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        assert_eq!(c.destination, sweep_stop);
    }

    #[test]
    fn blocked_open_space_falls_back_to_sweep_stop() {
        let probes = FakeProbes::default();
        let sweep_stop = Vec3::new(0.0, 152.0, -620.0);
        probes.script_ray(None); // nothing ahead (bit 0 clear)
        probes.script_capsule(hit(Vec3::ZERO, Vec3::Y)); // far end occupied (bit 1)
        probes.script_sphere(hit(Vec3::ZERO, Vec3::Y)); // no clearance above (bit 2)
        probes.script_capsule(hit(sweep_stop, Vec3::Z)); // sweep stops early (bit 3)

        // Bit 0 is clear, so open space can never fully reject.
        let c = resolve_destination(&probes, &mut NullDraw, &ctx()).unwrap();
        assert_eq!(c.destination, sweep_stop);
    }

    #[test]
    fn flags_reject_only_when_all_four_set() {
        let mut flags = ProbeFlags::default();
        flags.mark(0);
        flags.mark(1);
        flags.mark(2);
        assert!(!flags.rejects());
        flags.mark(3);
        assert!(flags.rejects());
    }
}
