//! Keyboard-driven stand-in for the camera and landmark model.
//!
//! [`SimulatedHand`] synthesises a landmark set from a [`HandPose`] so the
//! whole classification pipeline runs exactly as it would on model output.
//! The window sets the pose each frame through a [`PoseHandle`].

use std::cell::Cell;
use std::rc::Rc;

use handrace_common::GestureConfig;

use crate::landmarks::{Landmark, HAND_LANDMARK_COUNT, WRIST};
use crate::tracker::{FrameSource, HandLandmarker, VideoFrame};

/// Hand openness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grip {
    Fist,
    #[default]
    Relaxed,
    Open,
}

/// What the simulated hand is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandPose {
    pub present: bool,
    /// -1 left, 0 straight, +1 right
    pub steer: i8,
    pub grip: Grip,
}

/// Writer side of a simulated hand
#[derive(Debug, Clone)]
pub struct PoseHandle(Rc<Cell<HandPose>>);

impl PoseHandle {
    pub fn set(&self, pose: HandPose) {
        self.0.set(pose);
    }

    pub fn get(&self) -> HandPose {
        self.0.get()
    }
}

/// Landmark source that renders the current [`HandPose`]
#[derive(Debug)]
pub struct SimulatedHand {
    pose: Rc<Cell<HandPose>>,
    config: GestureConfig,
}

impl SimulatedHand {
    pub fn new(config: GestureConfig) -> (Self, PoseHandle) {
        let pose = Rc::new(Cell::new(HandPose::default()));
        let handle = PoseHandle(pose.clone());
        (Self { pose, config }, handle)
    }

    /// Landmarks that classify as `pose` under this hand's thresholds
    pub fn landmarks_for(&self, pose: HandPose) -> Vec<Landmark> {
        let cfg = &self.config;
        let extension = match pose.grip {
            Grip::Fist => cfg.fist_threshold * 0.5,
            Grip::Relaxed => (cfg.fist_threshold + cfg.palm_open_threshold) / 2.0,
            Grip::Open => cfg.palm_open_threshold * 1.5,
        };
        let reach = cfg.thumb_threshold * 1.25;

        let mut pts = vec![Landmark::new(0.5, 0.8); HAND_LANDMARK_COUNT];
        pts[WRIST] = Landmark::new(0.5, 0.85);
        pts[cfg.steer_base_index] = Landmark::new(0.5, 0.55);
        pts[cfg.steer_tip_index] = Landmark::new(0.5 + pose.steer.signum() as f32 * reach, 0.55);

        let steer_pair = [cfg.steer_tip_index, cfg.steer_base_index];
        for (slot, &(tip, knuckle)) in cfg.openness_pairs.iter().enumerate() {
            if !steer_pair.contains(&knuckle) {
                pts[knuckle] = Landmark::new(0.35 + 0.1 * slot as f32, 0.55);
            }
            let base = pts[knuckle];
            pts[tip] = Landmark::new(base.x, base.y - extension);
        }
        pts
    }
}

impl HandLandmarker for SimulatedHand {
    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> Option<Vec<Landmark>> {
        let pose = self.pose.get();
        pose.present.then(|| self.landmarks_for(pose))
    }
}

/// Fixed-rate frame clock
#[derive(Debug, Clone)]
pub struct SimCamera {
    frame_ms: f64,
}

impl SimCamera {
    pub fn new(fps: f64) -> Self {
        Self { frame_ms: 1000.0 / fps.max(1.0) }
    }
}

impl Default for SimCamera {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl FrameSource for SimCamera {
    fn next_frame(&mut self, now_ms: f64) -> Option<VideoFrame> {
        let sequence = (now_ms.max(0.0) / self.frame_ms).floor() as u64;
        Some(VideoFrame {
            media_time: sequence as f64 * self.frame_ms,
            sequence,
        })
    }
}
