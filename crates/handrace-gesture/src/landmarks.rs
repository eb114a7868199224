//! Hand keypoints as produced by the landmark model.
//!
//! The model reports 21 points per hand in normalised image coordinates
//! (0..1 on both axes, origin top-left):
//!
//! ```text
//!  0 wrist
//!  1-4   thumb   (CMC, MCP, IP, tip)
//!  5-8   index   (MCP, PIP, DIP, tip)
//!  9-12  middle
//! 13-16  ring
//! 17-20  pinky
//! ```

use serde::{Deserialize, Serialize};

pub use handrace_common::HAND_LANDMARK_COUNT;

pub const WRIST: usize = 0;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

/// One keypoint in normalised image space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
