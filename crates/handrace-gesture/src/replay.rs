//! Recorded landmark-model output, replayed in place of a live camera.
//!
//! A recording is a JSON-lines file, one camera frame per line:
//!
//! ```text
//! {"t": 0.0,  "landmarks": [{"x": 0.51, "y": 0.62}, ...]}
//! {"t": 33.4, "landmarks": null}
//! ```
//!
//! `t` is the frame's media time in milliseconds and must not decrease.
//! `landmarks: null` (or a missing field) is a frame without a hand.

use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::landmarks::Landmark;
use crate::tracker::{FrameSource, HandLandmarker, VideoFrame};
use crate::{PerceptionError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub t: f64,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

/// A loaded recording
#[derive(Debug, Clone)]
pub struct Recording {
    frames: Rc<[RecordedFrame]>,
}

impl Recording {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let recording = Self::parse(&text)?;
        tracing::info!(
            "Loaded {} recorded frames ({:.1}s) from {}",
            recording.len(),
            recording.duration_ms() / 1000.0,
            path.display()
        );
        Ok(recording)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut frames: Vec<RecordedFrame> = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame: RecordedFrame = serde_json::from_str(line)
                .map_err(|source| PerceptionError::Decode { line: idx + 1, source })?;
            if let Some(prev) = frames.last() {
                if frame.t < prev.t {
                    return Err(PerceptionError::OutOfOrder { line: idx + 1 });
                }
            }
            frames.push(frame);
        }
        if frames.is_empty() {
            return Err(PerceptionError::EmptyRecording);
        }
        Ok(Self { frames: frames.into() })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Media time span from the first to the last frame
    pub fn duration_ms(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }

    /// Split into a camera half and a model half sharing the same frames
    pub fn split(self, looping: bool) -> (ReplayCamera, ReplayLandmarker) {
        let camera = ReplayCamera {
            frames: self.frames.clone(),
            start_ms: None,
            looping,
        };
        let landmarker = ReplayLandmarker { frames: self.frames };
        (camera, landmarker)
    }
}

/// Plays back recorded frame times against the wall clock
#[derive(Debug)]
pub struct ReplayCamera {
    frames: Rc<[RecordedFrame]>,
    start_ms: Option<f64>,
    looping: bool,
}

impl FrameSource for ReplayCamera {
    fn next_frame(&mut self, now_ms: f64) -> Option<VideoFrame> {
        let first = self.frames.first()?.t;
        let last = self.frames.last()?.t;
        let start = *self.start_ms.get_or_insert(now_ms);

        let mut elapsed = (now_ms - start).max(0.0);
        let span = last - first;
        if self.looping && span > 0.0 && elapsed > span {
            elapsed %= span;
        }
        let media = first + elapsed;

        // Latest frame whose time has been reached
        let idx = self.frames.partition_point(|f| f.t <= media).saturating_sub(1);
        Some(VideoFrame {
            media_time: self.frames[idx].t,
            sequence: idx as u64,
        })
    }
}

/// Returns the recorded landmarks for the frame it is shown
#[derive(Debug)]
pub struct ReplayLandmarker {
    frames: Rc<[RecordedFrame]>,
}

impl HandLandmarker for ReplayLandmarker {
    fn detect(&mut self, frame: &VideoFrame, _timestamp_ms: f64) -> Option<Vec<Landmark>> {
        self.frames
            .get(frame.sequence as usize)
            .and_then(|f| f.landmarks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::hand;

    fn line(t: f64, landmarks: Option<Vec<Landmark>>) -> String {
        serde_json::to_string(&RecordedFrame { t, landmarks }).unwrap()
    }

    fn sample() -> String {
        [
            line(0.0, Some(hand(0.35, 0.07))),
            String::new(),
            line(33.0, None),
            "{\"t\": 66.0}".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn parses_jsonl() {
        let rec = Recording::parse(&sample()).unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.duration_ms(), 66.0);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let text = format!("{}\nnot json\n", line(0.0, None));
        match Recording::parse(&text) {
            Err(PerceptionError::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn empty_recording_is_an_error() {
        assert!(matches!(Recording::parse("\n\n"), Err(PerceptionError::EmptyRecording)));
    }

    #[test]
    fn time_must_not_go_backwards() {
        let text = format!("{}\n{}", line(10.0, None), line(5.0, None));
        assert!(matches!(Recording::parse(&text), Err(PerceptionError::OutOfOrder { line: 2 })));
    }

    #[test]
    fn camera_follows_wall_clock() {
        let (mut cam, mut model) = Recording::parse(&sample()).unwrap().split(false);

        let f0 = cam.next_frame(1000.0).unwrap();
        assert_eq!(f0.sequence, 0);
        assert!(model.detect(&f0, 1000.0).is_some());

        let same = cam.next_frame(1020.0).unwrap();
        assert_eq!(same.media_time, f0.media_time);

        let f1 = cam.next_frame(1040.0).unwrap();
        assert_eq!(f1.sequence, 1);
        assert!(model.detect(&f1, 1040.0).is_none());

        let end = cam.next_frame(9000.0).unwrap();
        assert_eq!(end.sequence, 2);
    }

    #[test]
    fn looping_camera_wraps() {
        let (mut cam, _) = Recording::parse(&sample()).unwrap().split(true);
        cam.next_frame(0.0);
        let wrapped = cam.next_frame(66.0 + 10.0).unwrap();
        assert_eq!(wrapped.sequence, 0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Recording::load("/no/such/recording.jsonl").unwrap_err();
        assert!(matches!(err, PerceptionError::Io(_)));
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("handrace-replay-{}.jsonl", std::process::id()));
        std::fs::write(&path, sample()).unwrap();
        let rec = Recording::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn bundled_demo_recording_classifies() {
        use crate::classify::RawGesture;
        use handrace_common::{GestureConfig, GestureLabel};

        let rec = Recording::parse(include_str!("../../../demos/drive.jsonl")).unwrap();
        assert_eq!(rec.len(), 150);
        let cfg = GestureConfig::default();
        let label_at = |i: usize| {
            rec.frames[i]
                .landmarks
                .as_deref()
                .and_then(|pts| RawGesture::from_landmarks(pts, &cfg))
                .map(|g| g.label)
        };
        assert_eq!(label_at(0), Some(GestureLabel::Fist));
        assert_eq!(label_at(54), Some(GestureLabel::ThumbLeft));
        assert_eq!(label_at(80), Some(GestureLabel::Neutral));
        assert_eq!(label_at(100), None);
        assert_eq!(label_at(120), Some(GestureLabel::ThumbRight));
        assert_eq!(label_at(140), Some(GestureLabel::OpenPalm));
    }
}
