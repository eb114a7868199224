//! Raw per-frame gesture classification.
//!
//! Two independent readings are taken from a single hand:
//!
//! * **Steer**: horizontal offset of the steering tip from its base
//!   landmark. Beyond `±thumb_threshold` the hand reads as left / right.
//! * **Openness**: mean tip-to-knuckle distance over four fingers. A
//!   spread hand (above `palm_open_threshold`) brakes, a fist (below
//!   `fist_threshold`) accelerates, anything between coasts.
//!
//! Both pedals are derived independently; only the label is prioritised.

use handrace_common::{GestureConfig, GestureLabel};

use crate::landmarks::Landmark;

/// Unsmoothed classification of one landmark set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawGesture {
    /// -1 = left, 0 = straight, +1 = right
    pub steer: i8,
    pub openness: f32,
    pub accelerate: bool,
    pub brake: bool,
    pub label: GestureLabel,
}

impl RawGesture {
    /// Classify a landmark set. Returns `None` when the set is too short
    /// to contain the configured indices.
    pub fn from_landmarks(landmarks: &[Landmark], config: &GestureConfig) -> Option<Self> {
        let tip = landmarks.get(config.steer_tip_index)?;
        let base = landmarks.get(config.steer_base_index)?;
        let thumb_dx = tip.x - base.x;

        let mut total = 0.0;
        for &(tip_idx, knuckle_idx) in &config.openness_pairs {
            let t = landmarks.get(tip_idx)?;
            let k = landmarks.get(knuckle_idx)?;
            total += t.distance(k);
        }
        let openness = total / config.openness_pairs.len() as f32;

        let steer = if thumb_dx < -config.thumb_threshold {
            -1
        } else if thumb_dx > config.thumb_threshold {
            1
        } else {
            0
        };
        let brake = openness > config.palm_open_threshold;
        let accelerate = openness < config.fist_threshold;

        Some(Self {
            steer,
            openness,
            accelerate,
            brake,
            label: pick_label(steer, accelerate, brake),
        })
    }
}

/// Steering wins over fist, fist wins over open palm
fn pick_label(steer: i8, fist: bool, palm_open: bool) -> GestureLabel {
    match steer {
        -1 => GestureLabel::ThumbLeft,
        1 => GestureLabel::ThumbRight,
        _ if fist => GestureLabel::Fist,
        _ if palm_open => GestureLabel::OpenPalm,
        _ => GestureLabel::Neutral,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::landmarks::*;

    /// Hand with the steering pair offset by `thumb_dx` and every finger
    /// extended `extension` above its knuckle.
    pub(crate) fn hand(thumb_dx: f32, extension: f32) -> Vec<Landmark> {
        let mut pts = vec![Landmark::new(0.5, 0.8); HAND_LANDMARK_COUNT];
        pts[RING_PIP] = Landmark::new(0.5, 0.55);
        pts[RING_MCP] = Landmark::new(0.5 + thumb_dx, 0.55);
        for (k, &(tip, knuckle)) in GestureConfig::default().openness_pairs.iter().enumerate() {
            if knuckle != RING_MCP {
                pts[knuckle] = Landmark::new(0.35 + 0.1 * k as f32, 0.55);
            }
            let base = pts[knuckle];
            pts[tip] = Landmark::new(base.x, base.y - extension);
        }
        pts
    }

    fn classify(pts: &[Landmark]) -> RawGesture {
        RawGesture::from_landmarks(pts, &GestureConfig::default()).unwrap()
    }

    #[test]
    fn thumb_offset_sets_direction() {
        assert_eq!(classify(&hand(-0.3, 0.07)).steer, -1);
        assert_eq!(classify(&hand(0.3, 0.07)).steer, 1);
        assert_eq!(classify(&hand(0.27, 0.07)).steer, 0);
        assert_eq!(classify(&hand(-0.1, 0.07)).steer, 0);
    }

    #[test]
    fn open_palm_brakes() {
        let g = classify(&hand(0.0, 0.09));
        assert!((g.openness - 0.09).abs() < 1e-5);
        assert!(g.brake);
        assert!(!g.accelerate);
        assert_eq!(g.label, GestureLabel::OpenPalm);
    }

    #[test]
    fn fist_accelerates() {
        let g = classify(&hand(0.0, 0.03));
        assert!(g.accelerate);
        assert!(!g.brake);
        assert_eq!(g.label, GestureLabel::Fist);
    }

    #[test]
    fn between_thresholds_coasts() {
        let g = classify(&hand(0.0, 0.07));
        assert!(!g.accelerate && !g.brake);
        assert_eq!(g.label, GestureLabel::Neutral);
    }

    #[test]
    fn steering_label_beats_pedal_label() {
        let g = classify(&hand(0.35, 0.03));
        assert_eq!(g.steer, 1);
        assert!(g.accelerate);
        assert_eq!(g.label, GestureLabel::ThumbRight);

        let g = classify(&hand(-0.35, 0.1));
        assert!(g.brake);
        assert_eq!(g.label, GestureLabel::ThumbLeft);
    }

    #[test]
    fn openness_is_mean_of_four_pairs() {
        let mut pts = hand(0.0, 0.07);
        // Curl the index finger fully; mean drops by a quarter of 0.07.
        pts[INDEX_TIP] = pts[INDEX_MCP];
        let g = classify(&pts);
        assert!((g.openness - 0.0525).abs() < 1e-5);
        assert!(g.accelerate);
    }

    #[test]
    fn short_landmark_set_is_rejected() {
        let pts = vec![Landmark::new(0.5, 0.5); 10];
        assert!(RawGesture::from_landmarks(&pts, &GestureConfig::default()).is_none());
    }

    #[test]
    fn label_priority_table() {
        assert_eq!(pick_label(0, true, true), GestureLabel::Fist);
        assert_eq!(pick_label(0, false, true), GestureLabel::OpenPalm);
        assert_eq!(pick_label(-1, true, true), GestureLabel::ThumbLeft);
        assert_eq!(pick_label(0, false, false), GestureLabel::Neutral);
    }
}
