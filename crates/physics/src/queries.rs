//! Geometry probes: single rays and shape sweeps against world geometry.
//!
//! These back the shift ability's destination validation. Sweep hit points
//! are the swept shape's *center* at the time of impact, which is what the
//! placement logic needs (a legal center position for the capsule).

use crate::collision::player_interaction_groups;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

/// Result of a geometry probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the probe to the hit.
    pub distance: f32,
    /// World position of the hit (shape center for sweeps).
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    fn probe_filter(&self, exclude: Option<ColliderHandle>) -> QueryFilter {
        let mut filter = QueryFilter::default().groups(player_interaction_groups());
        if let Some(handle) = exclude {
            filter = filter.exclude_collider(handle);
        }
        filter
    }

    /// Cast a ray from `origin` to `end` and return the first hit.
    pub fn raycast(
        &self,
        origin: Vec3,
        end: Vec3,
        exclude: Option<ColliderHandle>,
    ) -> Option<ProbeHit> {
        let dir = end - origin;
        let len = dir.length();
        if len < 1e-4 {
            return None;
        }
        let dir = dir / len;

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![dir.x, dir.y, dir.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                len,
                true,
                self.probe_filter(exclude),
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                ProbeHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// Sweep a sphere from `start` to `end` and return the first hit.
    pub fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        exclude: Option<ColliderHandle>,
    ) -> Option<ProbeHit> {
        self.sweep_shape(start, end, &Ball::new(radius), exclude)
    }

    /// Sweep a vertical capsule from `start` to `end`. A zero-length sweep
    /// degenerates to an overlap test at `start`.
    ///
    /// `half_height` is the full half-height, tip to center.
    pub fn sweep_capsule(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        half_height: f32,
        exclude: Option<ColliderHandle>,
    ) -> Option<ProbeHit> {
        let segment = (half_height - radius).max(0.0);
        self.sweep_shape(start, end, &Capsule::new_y(segment, radius), exclude)
    }

    fn sweep_shape(
        &self,
        start: Vec3,
        end: Vec3,
        shape: &dyn Shape,
        exclude: Option<ColliderHandle>,
    ) -> Option<ProbeHit> {
        let filter = self.probe_filter(exclude);
        let shape_pos = Isometry::translation(start.x, start.y, start.z);

        let dir = end - start;
        let len = dir.length();
        if len < 1e-4 {
            // Degenerate sweep: a pure overlap test. Overlaps carry no
            // meaningful impact geometry, only the fact of contact.
            let mut found = None;
            self.query_pipeline.intersections_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                shape,
                filter,
                |collider| {
                    found = Some(collider);
                    false
                },
            );
            return found.map(|collider| ProbeHit {
                collider,
                distance: 0.0,
                point: start,
                normal: Vec3::Y,
            });
        }

        let shape_vel = vector![dir.x, dir.y, dir.z];
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape_vel,
                shape,
                options,
                filter,
            )
            .map(|(collider, hit)| ProbeHit {
                collider,
                distance: hit.time_of_impact * len,
                point: start + dir * hit.time_of_impact,
                normal: Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z),
            })
    }
}
