//! Movement state machine: walk/run/crouch/slide stance resolution, speed
//! caps, and smoothed capsule-height blending.
//!
//! Runs once per frame before body integration. The stance decides the speed
//! cap written to the body; the crouch blend decides the capsule half-height.
//! Slides are entered from a sprint + crouch intent and decay back into a
//! crouch on their own.

use crate::body::CharacterBody;
use crate::config::MovementTuning;
use engine_core::Vec3;

/// Crouch (and slide-exit) speed is the base cap divided by this.
pub const CROUCH_SPEED_DIVISOR: f32 = 1.75;
/// Height blend snaps to target once within this many cm.
const HEIGHT_SNAP_EPSILON: f32 = 0.1;
/// Extra capsule shrink while the slide override is active (cm).
const SLIDE_HEIGHT_OFFSET: f32 = 10.0;
/// Height blend rate multiplier while the slide override is active.
const SLIDE_BLEND_MULTIPLIER: f32 = 2.0;

/// Mutually exclusive locomotion stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    #[default]
    Walking,
    Running,
    Crouching,
    Sliding,
}

/// Movement state machine. Intent flags are mutated by the input layer and
/// by the machine itself (sprinting cancels crouch intent, slides clear the
/// sprint intent).
#[derive(Debug)]
pub struct Locomotion {
    pub stance: Stance,
    /// Sprint intent (latched or held).
    pub sprinting: bool,
    /// Crouch intent (latched or held).
    pub wants_crouch: bool,
    /// Committed crouch state; set when the height blend lands on target.
    pub is_crouching: bool,
    pub is_sliding: bool,
    slide_override: bool,
    base_speed: f32,
    max_sprint_speed: f32,
    crouch_smooth: f32,
    slide_boost: f32,
    slide_decay: f32,
    standing_half_height: f32,
    crouched_half_height: f32,
}

impl Locomotion {
    pub fn new(tuning: &MovementTuning) -> Self {
        let base_speed = tuning.move_meters_per_sec * 100.0;
        Self {
            stance: Stance::Walking,
            sprinting: false,
            wants_crouch: false,
            is_crouching: false,
            is_sliding: false,
            slide_override: false,
            base_speed,
            max_sprint_speed: base_speed + base_speed * tuning.sprint_multiplier_pct / 100.0,
            crouch_smooth: tuning.crouch_smooth,
            slide_boost: tuning.slide_boost * 100.0,
            slide_decay: tuning.slide_decay,
            standing_half_height: tuning.standing_half_height,
            crouched_half_height: tuning.crouched_half_height,
        }
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn sprint_speed(&self) -> f32 {
        self.max_sprint_speed
    }

    /// Resolve the stance from intents and write the speed cap to the body.
    pub fn resolve_speed(&mut self, body: &mut CharacterBody, dt: f32) {
        if !self.is_sliding {
            if self.sprinting {
                if self.is_crouching {
                    self.wants_crouch = false;
                }
                self.stance = Stance::Running;
            } else if self.wants_crouch {
                self.stance = Stance::Crouching;
            } else {
                self.stance = Stance::Walking;
            }
        }

        match self.stance {
            Stance::Walking => body.max_speed = self.base_speed,
            Stance::Running => body.max_speed = self.max_sprint_speed,
            Stance::Crouching => body.max_speed = self.base_speed / CROUCH_SPEED_DIVISOR,
            Stance::Sliding => {
                let speed = body.horizontal_speed();
                body.max_speed = (speed - self.slide_decay * dt).max(0.0);
                if speed < self.base_speed / CROUCH_SPEED_DIVISOR {
                    self.end_slide();
                }
            }
        }
    }

    /// Blend the capsule toward the intended height. Entering a slide takes
    /// priority over the blend for that frame.
    pub fn blend_capsule(&mut self, body: &mut CharacterBody, forward: Vec3, dt: f32) {
        if self.sprinting && !self.is_crouching && self.wants_crouch {
            self.start_slide(body, forward);
            return;
        }

        let current = body.capsule_half_height;
        let mut target = if self.wants_crouch {
            self.crouched_half_height
        } else {
            self.standing_half_height
        };
        let mut rate_modifier = 1.0;

        if self.slide_override {
            rate_modifier = SLIDE_BLEND_MULTIPLIER;
            target -= SLIDE_HEIGHT_OFFSET;
        }

        let t = (dt * self.crouch_smooth * rate_modifier).min(1.0);
        let mut height = current + (target - current) * t;
        if (height - target).abs() < HEIGHT_SNAP_EPSILON {
            if self.slide_override {
                // The deep slide target was reached; resume blending toward
                // the regular crouch height next frame.
                self.slide_override = false;
                return;
            }
            height = target;
            self.is_crouching = self.wants_crouch;
        }
        body.capsule_half_height = height;
    }

    fn start_slide(&mut self, body: &mut CharacterBody, forward: Vec3) {
        if self.is_sliding {
            return;
        }
        self.is_sliding = true;
        self.sprinting = false;

        let mut velocity = body.velocity.linear;
        velocity.y = 0.0;
        velocity += forward * self.slide_boost;
        body.velocity.linear = velocity;
        // The boosted speed must survive this frame's cap clamp.
        body.max_speed = body.max_speed.max(velocity.length());

        self.slide_override = true;
        self.stance = Stance::Sliding;
        log::debug!("slide started at {:.0} cm/s", velocity.length());
    }

    fn end_slide(&mut self) {
        self.is_sliding = false;
        self.stance = Stance::Crouching;
        log::debug!("slide ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::PhysicsWorld;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (PhysicsWorld, CharacterBody, Locomotion) {
        let mut world = PhysicsWorld::new();
        let ground = world.add_static_body(Vec3::new(0.0, -50.0, 0.0));
        world.add_box_collider(ground, Vec3::new(4000.0, 50.0, 4000.0));
        world.update_query_pipeline();

        let tuning = MovementTuning::default();
        let mut body = CharacterBody::spawn(&mut world, Vec3::new(0.0, 88.0, 0.0), &tuning);
        body.integrate(&mut world, DT);
        let locomotion = Locomotion::new(&tuning);
        (world, body, locomotion)
    }

    /// One controller frame: stance, crouch blend, movement, integration.
    fn step(
        world: &mut PhysicsWorld,
        body: &mut CharacterBody,
        loco: &mut Locomotion,
        wish: Vec3,
    ) {
        loco.resolve_speed(body, DT);
        loco.blend_capsule(body, Vec3::NEG_Z, DT);
        body.apply_move(wish, DT);
        body.integrate(world, DT);
    }

    #[test]
    fn stance_follows_intents() {
        let (mut world, mut body, mut loco) = setup();

        step(&mut world, &mut body, &mut loco, Vec3::ZERO);
        assert_eq!(loco.stance, Stance::Walking);
        assert_eq!(body.max_speed, loco.base_speed());

        loco.sprinting = true;
        step(&mut world, &mut body, &mut loco, Vec3::ZERO);
        assert_eq!(loco.stance, Stance::Running);
        assert_eq!(body.max_speed, loco.sprint_speed());

        loco.sprinting = false;
        loco.wants_crouch = true;
        step(&mut world, &mut body, &mut loco, Vec3::ZERO);
        assert_eq!(loco.stance, Stance::Crouching);
        assert!((body.max_speed - loco.base_speed() / CROUCH_SPEED_DIVISOR).abs() < 1e-3);
    }

    #[test]
    fn sprinting_while_crouched_clears_crouch_intent() {
        let (mut world, mut body, mut loco) = setup();

        loco.wants_crouch = true;
        for _ in 0..200 {
            step(&mut world, &mut body, &mut loco, Vec3::ZERO);
        }
        assert!(loco.is_crouching);

        loco.sprinting = true;
        step(&mut world, &mut body, &mut loco, Vec3::ZERO);
        assert_eq!(loco.stance, Stance::Running);
        assert!(!loco.wants_crouch);
    }

    #[test]
    fn crouch_height_blend_is_monotonic_and_snaps() {
        let (mut world, mut body, mut loco) = setup();
        let target = 40.0;

        loco.wants_crouch = true;
        let mut previous = body.capsule_half_height;
        for _ in 0..400 {
            step(&mut world, &mut body, &mut loco, Vec3::ZERO);
            assert!(body.capsule_half_height <= previous + 1e-4);
            previous = body.capsule_half_height;
        }
        assert_eq!(body.capsule_half_height, target);
        assert!(loco.is_crouching);
        assert!(body.is_crouching_physically());
    }

    #[test]
    fn sprint_plus_crouch_enters_slide_not_crouch() {
        let (mut world, mut body, mut loco) = setup();

        // Get up to sprint speed first
        loco.sprinting = true;
        for _ in 0..120 {
            step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
        }
        assert_eq!(loco.stance, Stance::Running);
        let sprint_speed = body.horizontal_speed();

        loco.wants_crouch = true;
        step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
        assert_eq!(loco.stance, Stance::Sliding);
        assert!(loco.is_sliding);
        assert!(!loco.sprinting);
        // Slide entry boosts forward speed
        assert!(body.horizontal_speed() > sprint_speed);
    }

    #[test]
    fn slide_decays_and_terminates_in_crouch() {
        let (mut world, mut body, mut loco) = setup();

        loco.sprinting = true;
        for _ in 0..120 {
            step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
        }
        loco.wants_crouch = true;

        let mut frames = 0;
        while loco.is_sliding && frames < 1200 {
            step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
            frames += 1;
        }
        assert!(!loco.is_sliding, "slide never terminated");
        assert_eq!(loco.stance, Stance::Crouching);
        assert!(body.horizontal_speed() < loco.base_speed() / CROUCH_SPEED_DIVISOR + 1.0);
    }

    #[test]
    fn slide_speed_cap_decreases_each_frame() {
        let (mut world, mut body, mut loco) = setup();

        loco.sprinting = true;
        for _ in 0..120 {
            step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
        }
        loco.wants_crouch = true;
        step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
        assert!(loco.is_sliding);

        let mut previous_cap = body.max_speed;
        for _ in 0..30 {
            step(&mut world, &mut body, &mut loco, Vec3::NEG_Z);
            if !loco.is_sliding {
                break;
            }
            assert!(body.max_speed < previous_cap);
            previous_cap = body.max_speed;
        }
    }
}
