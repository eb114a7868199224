/// HandRace: lane-racing arcade game steered by hand gestures
///
/// Architecture:
///   engine/  : minifb window, keyboard commands, software renderer
///   game/    : Session loop, vehicle, obstacles, gesture input wiring
mod engine;
mod game;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use handrace_common::AppConfig;

use crate::game::input::{GestureInput, InputKind};
use crate::game::session::TickOutcome;
use crate::game::Game;

/// Headless runs step the simulation at this fixed rate
const HEADLESS_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "handrace", version, about = "Lane-racing arcade game steered by hand gestures")]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay recorded hand landmarks (JSON lines) instead of the simulated hand
    #[arg(short, long, conflicts_with = "camera")]
    replay: Option<PathBuf>,

    /// Restart the recording when it runs out
    #[arg(long = "loop", requires = "replay")]
    looping: bool,

    /// Use a live webcam and hand landmark model
    #[arg(long)]
    camera: bool,

    /// Fixed RNG seed for obstacle spawning
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many frames without a window, then print the result
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

impl Args {
    fn input_kind(&self) -> InputKind {
        match (&self.replay, self.camera) {
            (Some(path), _) => InputKind::Replay {
                path: path.clone(),
                looping: self.looping,
            },
            (None, true) => InputKind::Camera,
            (None, false) => InputKind::Simulated,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref()).with_context(|| {
        match &args.config {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Invalid built-in config".to_string(),
        }
    })?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("HandRace v{}", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => tracing::info!("Config: {}", path.display()),
        None => tracing::info!("Config: built-in defaults"),
    }

    let input = GestureInput::open(&args.input_kind(), &config.gesture);

    match args.headless {
        Some(frames) => {
            // Without a window there is nobody to read an on-screen error
            let input = input.context("Failed to open gesture input")?;
            run_headless(Game::new(&config, Ok(input)), frames);
            Ok(())
        }
        None => engine::run(Game::new(&config, input)),
    }
}

/// Where a headless run ended up
#[derive(Debug, Clone, PartialEq)]
struct HeadlessSummary {
    frames: u32,
    spawned: u32,
    /// Frame index and obstacle lane of the crash, if any
    crash: Option<(u32, usize)>,
    running: bool,
    tracking: bool,
    speed: f32,
    obstacles_on_road: usize,
    score: u64,
    detections: u64,
}

/// Step the game at a fixed dt and report where it ended up
fn run_headless(mut game: Game, frames: u32) -> HeadlessSummary {
    game.start();
    let mut spawned_total = 0;
    let mut crash = None;
    for i in 0..frames {
        let now_ms = f64::from(i) * f64::from(HEADLESS_DT) * 1000.0;
        match game.frame(HEADLESS_DT, now_ms) {
            TickOutcome::Advanced { spawned } => spawned_total += u32::from(spawned),
            TickOutcome::Crashed { obstacle } => {
                let lane = game.session.obstacles()[obstacle].lane;
                crash = Some((i, lane));
            }
            TickOutcome::Idle => {}
        }
    }

    let summary = HeadlessSummary {
        frames,
        spawned: spawned_total,
        crash,
        running: game.session.is_running(),
        tracking: game.tracking_enabled(),
        speed: game.session.vehicle().speed,
        obstacles_on_road: game.session.obstacles().len(),
        score: game.session.score(),
        detections: game.detections(),
    };
    tracing::info!("Headless run finished: {:?}", summary);

    let snap = game.snapshot();
    println!(
        "speed={} km/h score={} distance={} m status={}",
        snap.display_speed,
        snap.score,
        snap.distance,
        game.status_text()
    );
    summary
}
