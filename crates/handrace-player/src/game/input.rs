//! Gesture input wiring: which camera / landmark model feeds the tracker

use std::path::PathBuf;

use handrace_common::GestureConfig;
use handrace_gesture::{
    FrameSource, HandTracker, PerceptionError, PoseHandle, Recording, SimCamera, SimulatedHand,
};

/// Requested gesture input
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// Keyboard-posed simulated hand
    Simulated,
    /// Recorded landmark-model output (JSON lines)
    Replay { path: PathBuf, looping: bool },
    /// Live webcam + landmark model
    Camera,
}

/// An initialised perception pipeline
pub struct GestureInput {
    pub camera: Box<dyn FrameSource>,
    pub tracker: HandTracker,
    /// Present when the hand is keyboard-driven
    pub pose: Option<PoseHandle>,
}

impl GestureInput {
    /// Bring up camera and model. Failure leaves the game without gesture control.
    pub fn open(kind: &InputKind, config: &GestureConfig) -> Result<Self, PerceptionError> {
        let input = match kind {
            InputKind::Simulated => {
                let (hand, pose) = SimulatedHand::new(config.clone());
                GestureInput {
                    camera: Box::new(SimCamera::default()),
                    tracker: HandTracker::new(Box::new(hand), config.clone()),
                    pose: Some(pose),
                }
            }
            InputKind::Replay { path, looping } => {
                let (camera, model) = Recording::load(path)?.split(*looping);
                GestureInput {
                    camera: Box::new(camera),
                    tracker: HandTracker::new(Box::new(model), config.clone()),
                    pose: None,
                }
            }
            InputKind::Camera => {
                return Err(PerceptionError::Unavailable(
                    "no webcam backend in this build; use --replay or the simulated hand".into(),
                ));
            }
        };
        tracing::info!("Gesture input ready: {:?}", kind);
        Ok(input)
    }
}
