//! Per-tick control handoff from the gesture mapper to the session loop

use std::fmt;

use serde::{Deserialize, Serialize};

/// Steer magnitude beyond which the indicator lights a direction
pub const INDICATOR_STEER_THRESHOLD: f32 = 0.25;

/// Human-readable gesture status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureLabel {
    /// Tracking never produced a sample yet
    #[default]
    None,
    ThumbLeft,
    ThumbRight,
    Fist,
    OpenPalm,
    Neutral,
    NoHand,
    /// Tracking switched off by the player
    Stopped,
    /// Camera or landmark model failed to initialise
    Unavailable,
}

impl GestureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::None => "None",
            GestureLabel::ThumbLeft => "Thumb Left",
            GestureLabel::ThumbRight => "Thumb Right",
            GestureLabel::Fist => "Fist (Accel)",
            GestureLabel::OpenPalm => "Open Palm (Brake)",
            GestureLabel::Neutral => "Neutral",
            GestureLabel::NoHand => "No hand",
            GestureLabel::Stopped => "Stopped",
            GestureLabel::Unavailable => "Camera unavailable",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control input for one tick.
///
/// `steer` is continuous in [-1, 1]. Accelerate and brake are independent
/// and may both be set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSignal {
    pub steer: f32,
    pub accelerate: bool,
    pub brake: bool,
    pub label: GestureLabel,
}

impl ControlSignal {
    /// No steering, no pedals
    pub fn neutral(label: GestureLabel) -> Self {
        Self {
            steer: 0.0,
            accelerate: false,
            brake: false,
            label,
        }
    }

    pub fn indicator(&self) -> SteerIndicator {
        SteerIndicator {
            left: self.steer < -INDICATOR_STEER_THRESHOLD,
            right: self.steer > INDICATOR_STEER_THRESHOLD,
            accelerate: self.accelerate,
            brake: self.brake,
        }
    }
}

/// Which gesture indicator lamps are lit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SteerIndicator {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_thresholds() {
        let mut signal = ControlSignal::neutral(GestureLabel::Neutral);
        assert_eq!(signal.indicator(), SteerIndicator::default());

        signal.steer = -0.3;
        assert!(signal.indicator().left);
        assert!(!signal.indicator().right);

        signal.steer = 0.25;
        assert!(!signal.indicator().right);

        signal.steer = 0.9;
        signal.accelerate = true;
        signal.brake = true;
        let lamps = signal.indicator();
        assert!(lamps.right && lamps.accelerate && lamps.brake);
    }

    #[test]
    fn label_strings() {
        assert_eq!(GestureLabel::Fist.to_string(), "Fist (Accel)");
        assert_eq!(GestureLabel::NoHand.as_str(), "No hand");
        assert_eq!(ControlSignal::default().label, GestureLabel::None);
    }
}
