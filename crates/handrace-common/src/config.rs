//! Tuning configuration, loaded from TOML.
//!
//! Every section is `#[serde(default)]`, so a file only needs to name the
//! values it changes:
//!
//! ```toml
//! log_level = "debug"
//!
//! [vehicle]
//! accel_rate = 260.0
//!
//! [world]
//! lane_count = 4
//! seed = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::TrackBounds;

/// Number of keypoints produced by the hand landmark model
pub const HAND_LANDMARK_COUNT: usize = 21;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vehicle: VehicleConfig,
    pub world: WorldConfig,
    pub gesture: GestureConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleConfig::default(),
            world: WorldConfig::default(),
            gesture: GestureConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        self.world.validate()?;
        self.gesture.validate()?;
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

/// Finite and strictly above zero. NaN fails.
fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive, got {}", name, value)))
    }
}

/// Finite and not below zero. NaN fails.
fn require_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must not be negative, got {}", name, value)))
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// Player vehicle dimensions and rates (pixels, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub width: f32,
    pub height: f32,
    /// px/s² while accelerating
    pub accel_rate: f32,
    /// px/s² while braking
    pub brake_rate: f32,
    /// px/s² decay with no pedal pressed
    pub friction_rate: f32,
    /// px/s sideways at full steer
    pub lateral_rate: f32,
    /// Speed cap in internal units (px/s)
    pub max_internal_speed: f32,
    /// Speed shown to the player (km/h) when at the internal cap
    pub display_max_speed: f32,
    /// Clearance kept from both road edges
    pub bounds_margin: f32,
    pub color: u32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 70.0,
            accel_rate: 220.0,
            brake_rate: 400.0,
            friction_rate: 120.0,
            lateral_rate: 300.0,
            max_internal_speed: 420.0,
            display_max_speed: 260.0,
            bounds_margin: 10.0,
            color: 0xFF00D9FF,
        }
    }
}

impl VehicleConfig {
    fn validate(&self) -> Result<()> {
        require_positive("vehicle.width", self.width)?;
        require_positive("vehicle.height", self.height)?;
        require_positive("vehicle.max_internal_speed", self.max_internal_speed)?;
        require_non_negative("vehicle.display_max_speed", self.display_max_speed)?;
        require_non_negative("vehicle.accel_rate", self.accel_rate)?;
        require_non_negative("vehicle.brake_rate", self.brake_rate)?;
        require_non_negative("vehicle.friction_rate", self.friction_rate)?;
        require_non_negative("vehicle.lateral_rate", self.lateral_rate)?;
        require_non_negative("vehicle.bounds_margin", self.bounds_margin)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Road layout, spawner and scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub road: TrackBounds,
    pub lane_count: usize,
    /// Obstacle colour per lane, cycled when there are more lanes than colours
    pub lane_colors: Vec<u32>,
    /// Distance from the bottom of the viewport to the vehicle's top edge
    pub vehicle_bottom_offset: f32,

    /// Seconds between spawns at standstill
    pub spawn_interval: f32,
    /// Spawn interval floor at high speed
    pub min_spawn_interval: f32,
    /// Speed (px/s) that shortens the interval by one second
    pub spawn_speed_divisor: f32,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_height: f32,
    /// Gap between a fresh obstacle's bottom edge and the top of the view
    pub spawn_gap: f32,
    pub obstacle_base_speed: f32,
    pub obstacle_speed_factor: f32,
    /// Obstacles are dropped once `y >= viewport_height + cull_margin`
    pub cull_margin: f32,

    pub scroll_base: f32,
    pub scroll_factor: f32,
    /// Lane-marker dash + gap length
    pub marker_period: f32,
    pub distance_scale: f32,
    pub score_scale: f32,

    /// Largest dt the loop will integrate in one step
    pub max_dt: f32,
    /// Fixed RNG seed for reproducible obstacle layouts
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            road: TrackBounds::default(),
            lane_count: 3,
            lane_colors: vec![0xFFFF5555, 0xFFFFAA00, 0xFF55FF55],
            vehicle_bottom_offset: 90.0,
            spawn_interval: 1.0,
            min_spawn_interval: 0.55,
            spawn_speed_divisor: 1200.0,
            obstacle_min_width: 40.0,
            obstacle_max_width: 60.0,
            obstacle_height: 70.0,
            spawn_gap: 20.0,
            obstacle_base_speed: 220.0,
            obstacle_speed_factor: 0.6,
            cull_margin: 100.0,
            scroll_base: 180.0,
            scroll_factor: 0.2,
            marker_period: 34.0,
            distance_scale: 0.4,
            score_scale: 0.25,
            max_dt: 0.05,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Spawn position of the vehicle: centred on the road, near the bottom
    pub fn vehicle_start(&self, vehicle: &VehicleConfig) -> (f32, f32) {
        let x = self.road.left + self.road.width / 2.0 - vehicle.width / 2.0;
        let y = self.viewport_height - self.vehicle_bottom_offset;
        (x, y)
    }

    /// Colour tag for obstacles spawned in `lane`
    pub fn lane_color(&self, lane: usize) -> u32 {
        if self.lane_colors.is_empty() {
            return 0xFFFFFFFF;
        }
        self.lane_colors[lane % self.lane_colors.len()]
    }

    fn validate(&self) -> Result<()> {
        if self.lane_count == 0 {
            return Err(invalid("world.lane_count must be at least 1"));
        }
        require_positive("world.viewport_width", self.viewport_width)?;
        require_positive("world.viewport_height", self.viewport_height)?;
        require_positive("world.spawn_interval", self.spawn_interval)?;
        require_positive("world.min_spawn_interval", self.min_spawn_interval)?;
        require_positive("world.spawn_speed_divisor", self.spawn_speed_divisor)?;
        require_positive("world.obstacle_min_width", self.obstacle_min_width)?;
        require_positive("world.obstacle_max_width", self.obstacle_max_width)?;
        require_positive("world.obstacle_height", self.obstacle_height)?;
        require_positive("world.marker_period", self.marker_period)?;
        require_positive("world.max_dt", self.max_dt)?;
        require_positive("world.road.width", self.road.width)?;
        require_non_negative("world.road.left", self.road.left)?;
        for (name, value) in [
            ("world.vehicle_bottom_offset", self.vehicle_bottom_offset),
            ("world.spawn_gap", self.spawn_gap),
            ("world.obstacle_base_speed", self.obstacle_base_speed),
            ("world.obstacle_speed_factor", self.obstacle_speed_factor),
            ("world.cull_margin", self.cull_margin),
            ("world.scroll_base", self.scroll_base),
            ("world.scroll_factor", self.scroll_factor),
            ("world.distance_scale", self.distance_scale),
            ("world.score_scale", self.score_scale),
        ] {
            require_non_negative(name, value)?;
        }
        if self.obstacle_min_width > self.obstacle_max_width {
            return Err(invalid(format!(
                "obstacle width range is inverted ({} > {})",
                self.obstacle_min_width, self.obstacle_max_width
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// Gesture classification thresholds (normalised landmark space)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// EMA weight of the newest steer sample, 0 < alpha < 1
    pub alpha: f32,
    /// |tip.x - base.x| needed for a discrete left/right
    pub thumb_threshold: f32,
    /// Openness above this is an open palm (brake)
    pub palm_open_threshold: f32,
    /// Openness below this is a fist (accelerate)
    pub fist_threshold: f32,
    /// Smoothed steer below this magnitude snaps to 0 when no hand is seen
    pub snap_epsilon: f32,
    pub steer_tip_index: usize,
    pub steer_base_index: usize,
    /// (fingertip, knuckle) index pairs averaged into the openness metric
    pub openness_pairs: [(usize, usize); 4],
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            alpha: 0.35,
            thumb_threshold: 0.28,
            palm_open_threshold: 0.085,
            fist_threshold: 0.055,
            snap_epsilon: 0.02,
            steer_tip_index: 13,
            steer_base_index: 14,
            openness_pairs: [(8, 5), (12, 9), (16, 13), (20, 17)],
        }
    }
}

impl GestureConfig {
    fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(invalid(format!("gesture.alpha must be in (0, 1), got {}", self.alpha)));
        }
        require_positive("gesture.thumb_threshold", self.thumb_threshold)?;
        require_positive("gesture.palm_open_threshold", self.palm_open_threshold)?;
        require_positive("gesture.fist_threshold", self.fist_threshold)?;
        require_non_negative("gesture.snap_epsilon", self.snap_epsilon)?;
        if self.fist_threshold >= self.palm_open_threshold {
            return Err(invalid("gesture.fist_threshold must be below palm_open_threshold"));
        }
        let indices = self
            .openness_pairs
            .iter()
            .flat_map(|&(tip, knuckle)| [tip, knuckle])
            .chain([self.steer_tip_index, self.steer_base_index]);
        for idx in indices {
            if idx >= HAND_LANDMARK_COUNT {
                return Err(invalid(format!(
                    "landmark index {} out of range (model has {} points)",
                    idx, HAND_LANDMARK_COUNT
                )));
            }
        }
        if self.steer_tip_index == self.steer_base_index {
            return Err(invalid("gesture steering tip and base must be different landmarks"));
        }
        // Knuckles may double as steering points, fingertips may not
        for &(tip, _) in &self.openness_pairs {
            if tip == self.steer_tip_index || tip == self.steer_base_index {
                return Err(invalid(format!(
                    "landmark {} is an openness fingertip and cannot be a steering point",
                    tip
                )));
            }
        }
        Ok(())
    }
}
