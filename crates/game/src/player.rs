//! Player controller facade: turns input events into locomotion intents and
//! ability calls, and runs the fixed per-frame update order.
//!
//! Frame order matters and is the same every frame: ledger clock -> stance
//! and speed resolution -> capsule blend -> movement integration -> shift
//! transition writes (position last, so an in-flight shift wins the frame).

use crate::body::CharacterBody;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::debug::DebugDraw;
use crate::effects::EffectMarkers;
use crate::latch::ActionLatch;
use crate::locomotion::Locomotion;
use crate::shift::{ProbeContext, ShiftAbility, WorldProbes};
use engine_core::Vec3;
use input::InputState;
use physics::PhysicsWorld;

pub struct PlayerController {
    pub locomotion: Locomotion,
    pub shift: ShiftAbility,
    sprint_latch: ActionLatch,
    crouch_latch: ActionLatch,
    /// Raw look deltas are scaled by sensitivity / 10.
    look_scale: f32,
    eye_height: f32,
    move_intent: Vec3,
}

impl PlayerController {
    pub fn new(cfg: &GameConfig, base_fov: f32) -> Self {
        Self {
            locomotion: Locomotion::new(&cfg.movement),
            shift: ShiftAbility::new(&cfg.shift, base_fov),
            sprint_latch: ActionLatch::new(cfg.movement.sprint_toggle),
            crouch_latch: ActionLatch::new(cfg.movement.crouch_toggle),
            look_scale: cfg.sensitivity / 10.0,
            eye_height: cfg.movement.eye_height,
            move_intent: Vec3::ZERO,
        }
    }

    /// Apply this frame's input events: look, movement intent, stance
    /// intents, jump, and the shift prime/retarget/release edges.
    pub fn handle_input(
        &mut self,
        input: &InputState,
        camera: &mut Camera,
        body: &mut CharacterBody,
        world: &PhysicsWorld,
        effects: &mut EffectMarkers,
        debug: &mut dyn DebugDraw,
    ) {
        let look = input.mouse_delta() * self.look_scale;
        if look.length_squared() > 0.0 {
            camera.process_mouse(look.x, look.y);
        }

        let m = input.movement_input();
        self.move_intent =
            camera.transform.forward_flat() * m.y + camera.transform.right_flat() * m.x;
        if self.move_intent.length_squared() > 1.0 {
            self.move_intent = self.move_intent.normalize();
        }

        if input.is_sprint_pressed() {
            self.locomotion.sprinting = self.sprint_latch.resolve(self.locomotion.sprinting, true);
        }
        if input.is_sprint_released() {
            self.locomotion.sprinting = self.sprint_latch.resolve(self.locomotion.sprinting, false);
        }
        if input.is_crouch_pressed() {
            self.locomotion.wants_crouch =
                self.crouch_latch.resolve(self.locomotion.wants_crouch, true);
        }
        if input.is_crouch_released() {
            self.locomotion.wants_crouch =
                self.crouch_latch.resolve(self.locomotion.wants_crouch, false);
        }

        if input.is_jump_pressed() {
            // Jumping stands the character up first
            if body.is_crouching_physically() || self.locomotion.is_crouching {
                self.locomotion.is_crouching = false;
                self.locomotion.wants_crouch = false;
            }
            body.jump();
        }

        if input.is_shift_primed() {
            let probes = WorldProbes::new(world, Some(body.collider()));
            let ctx = self.probe_context(camera, body);
            self.shift.prime(&probes, debug, &ctx, effects);
        }
        if input.is_retarget_pressed() {
            self.shift.retarget(camera.position(), camera.forward());
        }
        if input.is_shift_released() {
            self.shift.execute(body.position(), effects);
        }
    }

    /// Advance one frame.
    pub fn update(
        &mut self,
        dt: f32,
        camera: &mut Camera,
        body: &mut CharacterBody,
        world: &mut PhysicsWorld,
    ) {
        self.shift.tick_ledger(dt);

        self.locomotion.resolve_speed(body, dt);
        let forward = camera.transform.forward_flat();
        self.locomotion.blend_capsule(body, forward, dt);

        body.apply_move(self.move_intent, dt);
        body.integrate(world, dt);

        self.shift.tick(dt, camera, body, world);

        camera.transform.position = body.position() + Vec3::Y * self.eye_height;
    }

    fn probe_context(&self, camera: &Camera, body: &CharacterBody) -> ProbeContext {
        ProbeContext {
            eye: camera.position(),
            look: camera.forward(),
            body_forward: camera.transform.forward_flat(),
            capsule_radius: body.capsule_radius,
            capsule_half_height: body.capsule_half_height,
            probe_distance: self.shift.probe_distance(),
        }
    }
}
