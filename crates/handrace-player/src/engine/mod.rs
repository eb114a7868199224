//! Game engine: minifb window plus the per-frame loop.
//!
//! The framebuffer matches the configured viewport with 32-bit ARGB pixels.
//! Text output goes into the window title, refreshed every few frames.

pub mod render;

use std::time::Instant;

use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use handrace_gesture::{Grip, HandPose};

use crate::game::session::TickOutcome;
use crate::game::Game;

use self::render::Canvas;

const FPS: usize = 60;
const TITLE_EVERY: u64 = 5;

/// Keyboard pose for the simulated hand
///
/// Left/Right tilt the thumb, Up closes the fist, Down opens the palm.
/// The hand is in view while any of them is held.
fn pose_from_keys(window: &Window) -> HandPose {
    let left = window.is_key_down(Key::Left);
    let right = window.is_key_down(Key::Right);
    let fist = window.is_key_down(Key::Up);
    let open = window.is_key_down(Key::Down);

    let steer = match (left, right) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    };
    let grip = match (fist, open) {
        (true, false) => Grip::Fist,
        (false, true) => Grip::Open,
        _ => Grip::Relaxed,
    };
    HandPose {
        present: left || right || fist || open,
        steer,
        grip,
    }
}

fn title(game: &Game) -> String {
    let snap = game.snapshot();
    let mut title = format!(
        "HandRace | {} km/h | Score {} | {} m | {}",
        snap.display_speed,
        snap.score,
        snap.distance,
        game.status_text(),
    );
    if let Some(msg) = snap.overlay_message() {
        title.push_str(" | ");
        title.push_str(msg);
    }
    if let Some(err) = game.fatal_error() {
        title.push_str(" | ");
        title.push_str(err);
    }
    title
}

/// Run the game engine until the window closes or Esc is pressed
pub fn run(mut game: Game) -> Result<()> {
    let world = game.session.world().clone();
    let width = world.viewport_width.round().max(1.0) as usize;
    let height = world.viewport_height.round().max(1.0) as usize;

    let options = WindowOptions {
        resize: true,
        scale_mode: minifb::ScaleMode::AspectRatioStretch,
        ..Default::default()
    };
    let mut window = Window::new("HandRace", width, height, options)
        .map_err(|e| anyhow::anyhow!("Window creation failed: {}", e))?;
    window.set_target_fps(FPS);

    let mut canvas = Canvas::new(width, height);
    let clock = Instant::now();
    let mut last = clock.elapsed().as_secs_f32();
    let mut frame_count: u64 = 0;

    tracing::info!("Engine initialized, entering game loop");
    tracing::info!("Controls: Enter=Start | P=Pause | R=Reset | H=Tracking | Esc=Quit");
    if game.uses_simulated_hand() {
        tracing::info!("Simulated hand: Left/Right=Thumb | Up=Fist | Down=Open palm");
    }

    while window.is_open() {
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            tracing::info!("Engine shutdown (Esc)");
            break;
        }
        for key in window.get_keys_pressed(KeyRepeat::No) {
            match key {
                Key::Enter => game.start(),
                Key::P => game.toggle_pause(),
                Key::R => game.reset(),
                Key::H => {
                    let on = game.toggle_tracking();
                    tracing::info!("Hand tracking → {}", if on { "on" } else { "off" });
                }
                _ => {}
            }
        }
        if game.uses_simulated_hand() {
            game.set_hand_pose(pose_from_keys(&window));
        }

        let now = clock.elapsed().as_secs_f32();
        let dt = now - last;
        last = now;
        if let TickOutcome::Crashed { .. } = game.frame(dt, now as f64 * 1000.0) {
            window.set_title(&title(&game));
        }

        let lamps = game.control().indicator();
        let fatal = game.fatal_error().is_some();
        render::draw(&mut canvas, &world, &game.snapshot(), lamps, fatal);

        frame_count += 1;
        if frame_count % TITLE_EVERY == 0 {
            window.set_title(&title(&game));
        }

        window
            .update_with_buffer(&canvas.pixels, width, height)
            .map_err(|e| anyhow::anyhow!("Display update failed: {}", e))?;
    }

    Ok(())
}
