//! Game logic: vehicle, obstacles, session loop and gesture input
//!
//! Frame order inside [`Game::frame`]:
//!   1. clamp dt
//!   2. perception step (at most one detection per camera frame)
//!   3. session tick with the resulting control signal
//!
//! Rendering happens afterwards from [`Game::snapshot`] and never triggers
//! perception itself.

pub mod input;
pub mod obstacle;
pub mod session;
pub mod vehicle;

use handrace_common::{AppConfig, ControlSignal, GestureLabel};
use handrace_gesture::{FrameSource, HandPose, HandTracker, PerceptionError, PoseHandle};

use self::input::GestureInput;
use self::session::{Session, SessionSnapshot, TickOutcome};

/// Session plus the gesture pipeline that drives it
pub struct Game {
    pub session: Session,
    camera: Option<Box<dyn FrameSource>>,
    tracker: Option<HandTracker>,
    pose: Option<PoseHandle>,
    control: ControlSignal,
    /// Set when camera/model initialisation failed
    fatal: Option<String>,
    max_dt: f32,
}

impl Game {
    /// Build the game around an opened (or failed) gesture input.
    ///
    /// An input error is reported once here and the game stays without
    /// gesture control for its lifetime.
    pub fn new(config: &AppConfig, input: Result<GestureInput, PerceptionError>) -> Self {
        let session = Session::new(config.world.clone(), config.vehicle.clone());
        let max_dt = config.world.max_dt;
        match input {
            Ok(mut input) => {
                input.tracker.start();
                Self {
                    session,
                    camera: Some(input.camera),
                    tracker: Some(input.tracker),
                    pose: input.pose,
                    control: ControlSignal::default(),
                    fatal: None,
                    max_dt,
                }
            }
            Err(e) => {
                tracing::error!("Failed to initialize camera or hand model: {}", e);
                Self {
                    session,
                    camera: None,
                    tracker: None,
                    pose: None,
                    control: ControlSignal::neutral(GestureLabel::Unavailable),
                    fatal: Some(e.to_string()),
                    max_dt,
                }
            }
        }
    }

    pub fn clamp_dt(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_dt)
    }

    /// Advance one animation frame
    pub fn frame(&mut self, dt: f32, now_ms: f64) -> TickOutcome {
        let dt = self.clamp_dt(dt);
        self.perceive(now_ms);
        self.session.tick(dt, &self.control)
    }

    /// Perception step for this frame; returns the control signal in effect
    pub fn perceive(&mut self, now_ms: f64) -> ControlSignal {
        if let (Some(camera), Some(tracker)) = (self.camera.as_mut(), self.tracker.as_mut()) {
            let frame = camera.next_frame(now_ms);
            self.control = tracker.step(frame.as_ref(), now_ms);
        }
        self.control
    }

    // --- Commands ---

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Hand tracking on/off. Returns the new state.
    pub fn toggle_tracking(&mut self) -> bool {
        match self.tracker.as_mut() {
            Some(tracker) => {
                let on = tracker.toggle();
                self.control = tracker.control();
                on
            }
            None => false,
        }
    }

    /// Update the simulated hand, if the input is keyboard-driven
    pub fn set_hand_pose(&self, pose: HandPose) {
        if let Some(handle) = &self.pose {
            handle.set(pose);
        }
    }

    // --- Display ---

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn control(&self) -> ControlSignal {
        self.control
    }

    /// Gesture status text; "Crashed!" overrides the gesture after a crash
    pub fn status_text(&self) -> &'static str {
        if self.session.is_crashed() {
            "Crashed!"
        } else {
            self.control.label.as_str()
        }
    }

    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    pub fn uses_simulated_hand(&self) -> bool {
        self.pose.is_some()
    }

    pub fn tracking_enabled(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.is_running())
    }

    /// Landmark detections run so far
    pub fn detections(&self) -> u64 {
        self.tracker.as_ref().map_or(0, |t| t.detections())
    }
}
