//! Perception seam: camera frames in, landmarks out, one detection per frame.
//!
//! The landmark model is expensive and only produces new information when
//! the camera has delivered a new frame, so [`HandTracker::step`] runs
//! detection at most once per distinct `media_time`. Between frames the
//! previous control signal simply persists.

use handrace_common::{ControlSignal, GestureConfig};

use crate::landmarks::Landmark;
use crate::mapper::GestureMapper;

/// Opaque handle to the latest camera frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoFrame {
    /// Presentation time of the frame in milliseconds, non-decreasing
    pub media_time: f64,
    /// Source-specific frame number
    pub sequence: u64,
}

/// Continuously updating frame source (camera, replay, simulation clock)
pub trait FrameSource {
    /// Latest frame available at wall-clock `now_ms`, if any
    fn next_frame(&mut self, now_ms: f64) -> Option<VideoFrame>;
}

/// Hand landmark model. `None` means no hand in the frame.
pub trait HandLandmarker {
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Option<Vec<Landmark>>;
}

/// Drives a [`HandLandmarker`] and feeds its output through a [`GestureMapper`]
pub struct HandTracker {
    landmarker: Box<dyn HandLandmarker>,
    mapper: GestureMapper,
    last_media_time: Option<f64>,
    detections: u64,
}

impl HandTracker {
    pub fn new(landmarker: Box<dyn HandLandmarker>, config: GestureConfig) -> Self {
        Self {
            landmarker,
            mapper: GestureMapper::new(config),
            last_media_time: None,
            detections: 0,
        }
    }

    pub fn start(&mut self) {
        self.mapper.start();
    }

    pub fn stop(&mut self) {
        self.mapper.stop();
    }

    /// Flip tracking on/off, returning the new state
    pub fn toggle(&mut self) -> bool {
        if self.mapper.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.mapper.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.mapper.is_running()
    }

    /// Run one perception step and return the control signal for this tick
    pub fn step(&mut self, frame: Option<&VideoFrame>, timestamp_ms: f64) -> ControlSignal {
        if !self.mapper.is_running() {
            return self.mapper.control();
        }
        let Some(frame) = frame else {
            return self.mapper.control();
        };
        if self.last_media_time == Some(frame.media_time) {
            tracing::trace!("Frame {} unchanged, skipping detection", frame.sequence);
            return self.mapper.control();
        }

        let landmarks = self.landmarker.detect(frame, timestamp_ms);
        self.last_media_time = Some(frame.media_time);
        self.detections += 1;
        self.mapper.update(landmarks.as_deref())
    }

    pub fn control(&self) -> ControlSignal {
        self.mapper.control()
    }

    /// Number of detection calls made so far
    pub fn detections(&self) -> u64 {
        self.detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::hand;
    use handrace_common::GestureLabel;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Always reports a right-steering hand; counts calls.
    struct CountingLandmarker {
        calls: Rc<Cell<u32>>,
    }

    impl HandLandmarker for CountingLandmarker {
        fn detect(&mut self, _frame: &VideoFrame, _ts: f64) -> Option<Vec<Landmark>> {
            self.calls.set(self.calls.get() + 1);
            Some(hand(0.35, 0.07))
        }
    }

    fn tracker() -> (HandTracker, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let lm = CountingLandmarker { calls: calls.clone() };
        let mut t = HandTracker::new(Box::new(lm), GestureConfig::default());
        t.start();
        (t, calls)
    }

    fn frame(media_time: f64) -> VideoFrame {
        VideoFrame { media_time, sequence: media_time as u64 }
    }

    #[test]
    fn detects_once_per_frame() {
        let (mut t, calls) = tracker();
        let first = t.step(Some(&frame(0.0)), 0.0);
        let again = t.step(Some(&frame(0.0)), 16.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(first, again);

        let next = t.step(Some(&frame(33.0)), 33.0);
        assert_eq!(calls.get(), 2);
        assert!(next.steer > first.steer);
        assert_eq!(t.detections(), 2);
    }

    #[test]
    fn missing_frame_keeps_signal() {
        let (mut t, calls) = tracker();
        let s = t.step(Some(&frame(1.0)), 1.0);
        assert_eq!(t.step(None, 2.0), s);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn stopped_tracker_does_not_detect() {
        let (mut t, calls) = tracker();
        assert!(!t.toggle());
        let s = t.step(Some(&frame(5.0)), 5.0);
        assert_eq!(calls.get(), 0);
        assert_eq!(s.label, GestureLabel::Stopped);
        assert!(t.toggle());
        t.step(Some(&frame(6.0)), 6.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(t.control().label, GestureLabel::ThumbRight);
    }
}
