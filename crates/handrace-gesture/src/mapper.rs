//! Gesture → control mapping with exponential steering smoothing.
//!
//! Raw steering is a discrete {-1, 0, +1}; the vehicle receives the
//! exponential moving average
//!
//! ```text
//! smoothed = alpha * raw + (1 - alpha) * previous
//! ```
//!
//! When the hand disappears the raw sample counts as 0, so the average
//! decays towards straight-ahead and snaps to exactly 0 once it is inside
//! `snap_epsilon`. Pedals are never smoothed.

use handrace_common::{ControlSignal, GestureConfig, GestureLabel};

use crate::classify::RawGesture;
use crate::landmarks::Landmark;

/// Control signal for a detected hand, smoothing steer against
/// `previous_smoothed`.
///
/// A landmark set too short for the configured indices is treated as a
/// missing hand.
pub fn classify(
    landmarks: &[Landmark],
    previous_smoothed: f32,
    config: &GestureConfig,
) -> ControlSignal {
    match RawGesture::from_landmarks(landmarks, config) {
        Some(raw) => {
            let smoothed = ema(raw.steer as f32, previous_smoothed, config.alpha);
            ControlSignal {
                steer: smoothed.clamp(-1.0, 1.0),
                accelerate: raw.accelerate,
                brake: raw.brake,
                label: raw.label,
            }
        }
        None => no_hand(previous_smoothed, config),
    }
}

/// Control signal for a frame in which no hand was found
pub fn no_hand(previous_smoothed: f32, config: &GestureConfig) -> ControlSignal {
    let mut steer = ema(0.0, previous_smoothed, config.alpha);
    if steer.abs() < config.snap_epsilon {
        steer = 0.0;
    }
    ControlSignal {
        steer: steer.clamp(-1.0, 1.0),
        accelerate: false,
        brake: false,
        label: GestureLabel::NoHand,
    }
}

fn ema(sample: f32, previous: f32, alpha: f32) -> f32 {
    alpha * sample + (1.0 - alpha) * previous
}

/// Owns the smoothing accumulator and the tracking on/off state
#[derive(Debug, Clone)]
pub struct GestureMapper {
    config: GestureConfig,
    smoothed_steer: f32,
    running: bool,
    signal: ControlSignal,
}

impl GestureMapper {
    /// New mapper, not yet running
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            smoothed_steer: 0.0,
            running: false,
            signal: ControlSignal::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::info!("Hand tracking started");
        }
        self.running = true;
    }

    /// Stop tracking: neutral controls, smoothing cleared
    pub fn stop(&mut self) {
        if self.running {
            tracing::info!("Hand tracking stopped");
        }
        self.running = false;
        self.smoothed_steer = 0.0;
        self.signal = ControlSignal::neutral(GestureLabel::Stopped);
    }

    /// Feed one detection result. Ignored while stopped.
    pub fn update(&mut self, landmarks: Option<&[Landmark]>) -> ControlSignal {
        if !self.running {
            return self.signal;
        }
        self.signal = match landmarks {
            Some(points) => classify(points, self.smoothed_steer, &self.config),
            None => no_hand(self.smoothed_steer, &self.config),
        };
        self.smoothed_steer = self.signal.steer;
        tracing::trace!(
            "Gesture: {} steer={:.3} accel={} brake={}",
            self.signal.label,
            self.signal.steer,
            self.signal.accelerate,
            self.signal.brake
        );
        self.signal
    }

    /// Most recent control signal
    pub fn control(&self) -> ControlSignal {
        self.signal
    }

    pub fn smoothed_steer(&self) -> f32 {
        self.smoothed_steer
    }
}
