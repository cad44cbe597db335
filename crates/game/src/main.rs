//! OpenPhase: first-person movement sandbox built around a phase-shift
//! traversal ability.
//!
//! Runs a scripted headless session on the test range: walk, sprint, slide,
//! then prime and fire a shift. State is narrated through the log; run with
//! `RUST_LOG=debug` (or `trace` for probe draws) to watch it.

mod arena;
mod body;
mod camera;
mod config;
mod debug;
mod effects;
mod latch;
mod locomotion;
mod player;
mod shift;

use anyhow::Result;
use arena::Arena;
use body::CharacterBody;
use camera::Camera;
use config::GameConfig;
use debug::LogDraw;
use effects::EffectMarkers;
use engine_core::{Time, Vec3};
use input::{ElementState, InputState, KeyCode};
use player::PlayerController;

const DT: f32 = 1.0 / 60.0;
const DEMO_FRAMES: u64 = 720;

enum Action {
    Key(KeyCode, ElementState),
    Look(f64, f64),
}

/// The demo timeline: frame number -> input event.
fn script() -> Vec<(u64, Action)> {
    use Action::*;
    use ElementState::*;
    vec![
        (30, Key(KeyCode::KeyW, Pressed)),
        (90, Key(KeyCode::ShiftLeft, Pressed)),
        // Crouch at sprint speed: slide entry
        (150, Key(KeyCode::ControlLeft, Pressed)),
        (240, Key(KeyCode::ControlLeft, Released)),
        (240, Key(KeyCode::ShiftLeft, Released)),
        (420, Key(KeyCode::KeyW, Released)),
        // Turn around, then prime -> retarget -> fire the shift
        (500, Look(-3141.6, 0.0)),
        (540, Key(KeyCode::KeyQ, Pressed)),
        (560, Key(KeyCode::KeyF, Pressed)),
        (561, Key(KeyCode::KeyF, Released)),
        (570, Key(KeyCode::KeyQ, Released)),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let cfg = GameConfig::load();
    let mut arena = Arena::test_range();
    let mut body = CharacterBody::spawn(
        &mut arena.physics,
        Vec3::new(-600.0, cfg.movement.standing_half_height, 0.0),
        &cfg.movement,
    );
    let mut camera = Camera::new(body.position() + Vec3::Y * cfg.movement.eye_height);
    camera.set_yaw_pitch(std::f32::consts::PI, 0.0); // face the open lane
    let mut controller = PlayerController::new(&cfg, camera.fov_degrees);
    let mut input = InputState::new();
    let mut effects = EffectMarkers::new();
    let mut draw = LogDraw;

    let timeline = script();
    let mut time = Time::new();

    log::info!("openphase demo: {} frames at 60 Hz", DEMO_FRAMES);

    for frame in 0..DEMO_FRAMES {
        time.update();
        input.begin_frame();

        for (at, action) in &timeline {
            if *at != frame {
                continue;
            }
            match action {
                Action::Key(key, state) => input.process_keyboard(*key, *state),
                Action::Look(dx, dy) => input.process_mouse_motion((*dx, *dy)),
            }
        }

        controller.handle_input(
            &input,
            &mut camera,
            &mut body,
            &arena.physics,
            &mut effects,
            &mut draw,
        );
        controller.update(DT, &mut camera, &mut body, &mut arena.physics);
        arena.physics.step();

        if frame % 60 == 0 {
            let p = body.position();
            log::info!(
                "t={:>4.1}s stance={:?} speed={:>6.0} cm/s pool={:>5.1} pos=({:>6.0},{:>4.0},{:>6.0}) fov={:>5.1}",
                frame as f32 * DT,
                controller.locomotion.stance,
                body.horizontal_speed(),
                controller.shift.ledger.pool,
                p.x,
                p.y,
                p.z,
                camera.fov_degrees,
            );
        }
    }

    log::info!(
        "demo complete: {} sim frames in {:.2}s wall time, final position {:?}",
        time.frame_count(),
        time.elapsed_seconds(),
        body.position(),
    );

    Ok(())
}
