//! Player vehicle kinematics
//!
//! The vehicle never moves forward on screen: forward progress is the
//! world scrolling past it. Per tick it only integrates
//!   - longitudinal speed from accelerate / brake / friction
//!   - lateral position from the continuous steer value
//! and is then clamped to the road.

use handrace_common::{Rect, TrackBounds, VehicleConfig};

/// The player's car
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub x: f32,
    pub y: f32,
    /// Internal speed (px/s), always within [0, max_internal_speed]
    pub speed: f32,
    pub alive: bool,
    props: VehicleConfig,
}

impl Vehicle {
    pub fn new(x: f32, y: f32, props: VehicleConfig) -> Self {
        Self {
            x,
            y,
            speed: 0.0,
            alive: true,
            props,
        }
    }

    pub fn color(&self) -> u32 {
        self.props.color
    }

    /// Integrate one tick. No-op once crashed.
    ///
    /// Accelerate and brake are additive when both are held.
    pub fn update(
        &mut self,
        dt: f32,
        steer: f32,
        accelerate: bool,
        brake: bool,
        bounds: Option<&TrackBounds>,
    ) {
        if !self.alive {
            return;
        }

        // --- Longitudinal ---
        if accelerate {
            self.speed += self.props.accel_rate * dt;
        }
        if brake {
            self.speed -= self.props.brake_rate * dt;
        }
        if !accelerate && !brake {
            let decay = self.props.friction_rate * dt;
            if self.speed > 0.0 {
                self.speed = (self.speed - decay).max(0.0);
            } else if self.speed < 0.0 {
                self.speed = (self.speed + decay).min(0.0);
            }
        }
        self.speed = self.speed.clamp(0.0, self.props.max_internal_speed);

        // --- Lateral ---
        self.x += steer * self.props.lateral_rate * dt;

        if let Some(road) = bounds {
            let (min_x, max_x) = road.clamp_range(self.props.width, self.props.bounds_margin);
            self.x = self.x.max(min_x).min(max_x);
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.props.width, self.props.height)
    }

    /// Bounding-box overlap, touching edges included
    pub fn collides_with(&self, other: &Rect) -> bool {
        self.rect().overlaps(other)
    }

    /// Speed in display units (km/h), rounded
    pub fn display_speed(&self) -> u32 {
        let ratio = self.speed / self.props.max_internal_speed;
        (ratio * self.props.display_max_speed).round().max(0.0) as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> Vehicle {
        Vehicle::new(200.0, 510.0, VehicleConfig::default())
    }

    #[test]
    fn acceleration_from_rest() {
        let mut v = car();
        v.update(1.0, 0.0, true, false, None);
        assert!((v.speed - 220.0).abs() < 1e-3);
    }

    #[test]
    fn speed_capped_at_max() {
        let mut v = car();
        v.speed = 420.0;
        v.update(1.0, 0.0, true, false, None);
        assert_eq!(v.speed, 420.0);
    }

    #[test]
    fn braking_never_goes_negative() {
        let mut v = car();
        v.speed = 100.0;
        v.update(1.0, 0.0, false, true, None);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn accelerate_and_brake_are_additive() {
        let mut v = car();
        v.speed = 300.0;
        v.update(0.1, 0.0, true, true, None);
        // +22 - 40
        assert!((v.speed - 282.0).abs() < 1e-3);
    }

    #[test]
    fn friction_decays_without_overshoot() {
        let mut v = car();
        v.speed = 50.0;
        v.update(0.25, 0.0, false, false, None);
        assert!((v.speed - 20.0).abs() < 1e-3);
        v.update(0.25, 0.0, false, false, None);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn negative_speed_decays_up_to_zero() {
        let mut v = car();
        v.speed = -5.0;
        v.update(0.01, 0.0, false, false, None);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn steering_moves_sideways() {
        let mut v = car();
        v.update(0.1, 1.0, false, false, None);
        assert!((v.x - 230.0).abs() < 1e-3);
        v.update(0.1, -0.5, false, false, None);
        assert!((v.x - 215.0).abs() < 1e-3);
    }

    #[test]
    fn bounds_clamp_position() {
        let road = TrackBounds::new(200.0, 400.0);
        let mut v = car();
        v.update(1.0, -1.0, false, false, Some(&road));
        assert_eq!(v.x, 210.0);
        v.update(5.0, 1.0, false, false, Some(&road));
        assert_eq!(v.x, 550.0);
    }

    #[test]
    fn rest_state_is_idempotent() {
        let road = TrackBounds::new(200.0, 400.0);
        let mut v = Vehicle::new(300.0, 510.0, VehicleConfig::default());
        for _ in 0..100 {
            v.update(0.05, 0.0, false, false, Some(&road));
        }
        assert_eq!(v.speed, 0.0);
        assert_eq!(v.x, 300.0);
    }

    #[test]
    fn invariants_hold_for_arbitrary_inputs() {
        let road = TrackBounds::new(200.0, 400.0);
        let mut v = car();
        let dts = [0.0, 0.001, 0.016, 0.05, 0.3, 2.0];
        let steers = [-1.0, -0.4, 0.0, 0.7, 1.0];
        for (i, &dt) in dts.iter().cycle().take(300).enumerate() {
            let steer = steers[i % steers.len()];
            v.update(dt, steer, i % 3 == 0, i % 5 == 0, Some(&road));
            assert!((0.0..=420.0).contains(&v.speed), "speed {} out of range", v.speed);
            assert!((210.0..=550.0).contains(&v.x), "x {} out of range", v.x);
        }
    }

    #[test]
    fn crashed_vehicle_is_frozen() {
        let mut v = car();
        v.speed = 100.0;
        v.alive = false;
        v.update(1.0, 1.0, true, false, None);
        assert_eq!(v.speed, 100.0);
        assert_eq!(v.x, 200.0);
    }

    #[test]
    fn collision_is_non_strict() {
        let v = car();
        let touching = Rect::new(240.0, 510.0, 10.0, 10.0);
        let apart = Rect::new(240.5, 510.0, 10.0, 10.0);
        assert!(v.collides_with(&touching));
        assert!(!v.collides_with(&apart));
    }

    #[test]
    fn display_speed_scales_linearly() {
        let mut v = car();
        assert_eq!(v.display_speed(), 0);
        v.speed = 420.0;
        assert_eq!(v.display_speed(), 260);
        v.speed = 210.0;
        assert_eq!(v.display_speed(), 130);
    }
}
