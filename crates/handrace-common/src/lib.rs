//! Common types shared across HandRace crates

pub mod config;
pub mod control;
pub mod geometry;

pub use config::{
    AppConfig, ConfigError, GestureConfig, VehicleConfig, WorldConfig, HAND_LANDMARK_COUNT,
};
pub use control::{ControlSignal, GestureLabel, SteerIndicator};
pub use geometry::{Rect, TrackBounds};
