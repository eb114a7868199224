//! Hand-gesture input for HandRace
//!
//! This crate handles:
//! - Classifying hand landmarks into steer / accelerate / brake
//! - Smoothing steering over time ([`GestureMapper`])
//! - The perception seam: frame sources and landmark models ([`HandTracker`])
//! - Replayed model output and a keyboard-driven simulated hand
//!
//! The landmark model itself is external; anything implementing
//! [`HandLandmarker`] can drive the game.

pub mod classify;
pub mod landmarks;
pub mod mapper;
pub mod replay;
pub mod sim;
pub mod tracker;

use thiserror::Error;

pub use classify::RawGesture;
pub use landmarks::Landmark;
pub use mapper::{classify, no_hand, GestureMapper};
pub use replay::{Recording, ReplayCamera, ReplayLandmarker};
pub use sim::{Grip, HandPose, PoseHandle, SimCamera, SimulatedHand};
pub use tracker::{FrameSource, HandLandmarker, HandTracker, VideoFrame};

/// Camera or landmark-model initialisation failure
#[derive(Error, Debug)]
pub enum PerceptionError {
    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recording at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Recording contains no frames")]
    EmptyRecording,

    #[error("Recording time goes backwards at line {line}")]
    OutOfOrder { line: usize },

    #[error("Hand tracking unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, PerceptionError>;
