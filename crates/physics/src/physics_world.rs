//! Physics world management with Rapier3D.

use crate::collision::{env_interaction_groups, player_interaction_groups};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Gravity in cm/s² (centimeter world units).
pub const GRAVITY: f32 = 981.0;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -GRAVITY, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for probes without stepping the simulation.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static rigid body (for floors, walls, ledges).
    pub fn add_static_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a kinematic rigid body (the player).
    pub fn add_kinematic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add an environment box collider to a rigid body.
    pub fn add_box_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(env_interaction_groups())
            .build();
        self.collider_set.insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a vertical capsule collider to a rigid body (the player shape).
    /// `half_height` is the full capsule half-height, tip to center.
    pub fn add_capsule_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        radius: f32,
        half_height: f32,
    ) -> ColliderHandle {
        // rapier's capsule_y takes the cylinder segment half-length, not the
        // full half-height including end caps.
        let segment = (half_height - radius).max(0.0);
        let collider = ColliderBuilder::capsule_y(segment, radius)
            .collision_groups(player_interaction_groups())
            .build();
        self.collider_set.insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Resize an existing capsule collider (crouch height blending writes
    /// through here every frame the height changes).
    pub fn set_capsule_half_height(
        &mut self,
        collider: ColliderHandle,
        radius: f32,
        half_height: f32,
    ) {
        if let Some(c) = self.collider_set.get_mut(collider) {
            let segment = (half_height - radius).max(0.0);
            c.set_shape(SharedShape::capsule_y(segment, radius));
        } else {
            log::warn!("set_capsule_half_height: stale collider handle {:?}", collider);
        }
    }

    /// Move a body to an absolute position (teleports, kinematic writes).
    pub fn set_body_translation(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(b) = self.rigid_body_set.get_mut(body) {
            b.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    /// Current position of a body's origin.
    pub fn body_translation(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body).map(|b| {
            let t = b.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }
}
