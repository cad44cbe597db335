//! Character body: the kinematic capsule the controller steers.
//!
//! Owns velocity, the mutable speed cap the movement state machine writes,
//! and the blended capsule half-height. Integration is kinematic: velocity
//! applied to position, a short downward ray for grounding, and the result
//! written through to the physics body.

use crate::config::MovementTuning;
use engine_core::{Vec3, Velocity};
use physics::physics_world::GRAVITY;
use physics::PhysicsWorld;
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Exponential approach rate for input-driven horizontal velocity (1/s).
const GROUND_ACCEL: f32 = 10.0;
/// How far below the capsule the ground ray reaches (cm).
const GROUND_SNAP: f32 = 2.0;

pub struct CharacterBody {
    /// Horizontal speed cap, written by the movement state machine every frame.
    pub max_speed: f32,
    pub velocity: Velocity,
    pub capsule_radius: f32,
    /// Blended capsule half-height (crouch smoothing writes this).
    pub capsule_half_height: f32,
    pub grounded: bool,
    crouched_half_height: f32,
    jump_speed: f32,
    position: Vec3,
    synced_half_height: f32,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl CharacterBody {
    /// Spawn the kinematic capsule into the physics world.
    pub fn spawn(world: &mut PhysicsWorld, position: Vec3, tuning: &MovementTuning) -> Self {
        let body = world.add_kinematic_body(position);
        let collider =
            world.add_capsule_collider(body, tuning.capsule_radius, tuning.standing_half_height);
        Self {
            max_speed: tuning.move_meters_per_sec * 100.0,
            velocity: Velocity::default(),
            capsule_radius: tuning.capsule_radius,
            capsule_half_height: tuning.standing_half_height,
            grounded: false,
            crouched_half_height: tuning.crouched_half_height,
            jump_speed: tuning.jump_speed,
            position,
            synced_half_height: tuning.standing_half_height,
            body,
            collider,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    /// Teleport-style absolute position write (the shift transition drives
    /// this every frame while in flight).
    pub fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        world.set_body_translation(self.body, position);
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.horizontal_speed()
    }

    /// Whether the capsule is at (or nearly at) the crouched height.
    pub fn is_crouching_physically(&self) -> bool {
        self.capsule_half_height <= self.crouched_half_height + 0.5
    }

    /// Steer horizontal velocity toward `wish_dir x max_speed` and clamp the
    /// result to the cap. The state machine lowers the cap during slides,
    /// which is what makes them decay.
    pub fn apply_move(&mut self, wish_dir: Vec3, dt: f32) {
        let horizontal = Vec3::new(self.velocity.linear.x, 0.0, self.velocity.linear.z);
        let target = wish_dir * self.max_speed;
        let blend = (GROUND_ACCEL * dt).min(1.0);
        let mut next = horizontal + (target - horizontal) * blend;

        let speed = next.length();
        if speed > self.max_speed {
            next *= self.max_speed / speed.max(1e-6);
        }

        self.velocity.linear.x = next.x;
        self.velocity.linear.z = next.z;
    }

    /// Jump if grounded.
    pub fn jump(&mut self) {
        if self.grounded {
            self.velocity.linear.y = self.jump_speed;
            self.grounded = false;
        }
    }

    /// Advance the body one frame: gravity, position integration, capsule
    /// resize write-through, ground snap, and the physics-body write.
    pub fn integrate(&mut self, world: &mut PhysicsWorld, dt: f32) {
        if !self.grounded {
            self.velocity.linear.y -= GRAVITY * dt;
        }
        self.position += self.velocity.linear * dt;

        if (self.capsule_half_height - self.synced_half_height).abs() > 1e-3 {
            world.set_capsule_half_height(
                self.collider,
                self.capsule_radius,
                self.capsule_half_height,
            );
            self.synced_half_height = self.capsule_half_height;
        }

        let probe_end = self.position - Vec3::Y * (self.capsule_half_height + GROUND_SNAP);
        match world.raycast(self.position, probe_end, Some(self.collider)) {
            Some(hit) if self.velocity.linear.y <= 0.0 => {
                self.position.y = hit.point.y + self.capsule_half_height;
                self.velocity.linear.y = 0.0;
                self.grounded = true;
            }
            _ => self.grounded = false,
        }

        world.set_body_translation(self.body, self.position);
    }
}
