//! Obstacles and the timer-driven spawner

use rand::Rng;

use handrace_common::{Rect, WorldConfig};

/// A blocking car in one of the lanes
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub lane: usize,
    /// ARGB colour tag derived from the lane
    pub color: u32,
}

/// Accumulates time and decides when the next obstacle appears.
///
/// The interval shrinks as the player speeds up:
/// `max(min_spawn_interval, spawn_interval - speed / spawn_speed_divisor)`.
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    timer: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn interval(world: &WorldConfig, speed: f32) -> f32 {
        (world.spawn_interval - speed / world.spawn_speed_divisor).max(world.min_spawn_interval)
    }

    /// Advance by `dt`; true when an obstacle is due (timer resets)
    pub fn tick(&mut self, dt: f32, speed: f32, world: &WorldConfig) -> bool {
        self.timer += dt;
        if self.timer > Self::interval(world, speed) {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }

    /// New obstacle in a random lane, centred horizontally, just above the view
    pub fn spawn<R: Rng>(rng: &mut R, world: &WorldConfig) -> Obstacle {
        let lane_count = world.lane_count.max(1);
        let lane_width = world.road.lane_width(lane_count);
        let lane = rng.gen_range(0..lane_count);
        let width = world.obstacle_min_width
            + rng.gen::<f32>() * (world.obstacle_max_width - world.obstacle_min_width);
        let height = world.obstacle_height;
        let x = world.road.left + lane as f32 * lane_width + (lane_width - width) / 2.0;
        let y = -height - world.spawn_gap;

        Obstacle {
            rect: Rect::new(x, y, width, height),
            lane,
            color: world.lane_color(lane),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn interval_shrinks_with_speed() {
        let world = WorldConfig::default();
        assert_eq!(Spawner::interval(&world, 0.0), 1.0);
        assert!((Spawner::interval(&world, 240.0) - 0.8).abs() < 1e-6);
        assert!((Spawner::interval(&world, 420.0) - 0.65).abs() < 1e-6);
        assert_eq!(Spawner::interval(&world, 10_000.0), 0.55);
    }

    #[test]
    fn fires_only_after_threshold_exceeded() {
        let world = WorldConfig::default();
        let mut s = Spawner::new();
        for _ in 0..19 {
            assert!(!s.tick(0.05, 0.0, &world));
        }
        // Timer sits at ~0.95; exceeding 1.0 fires and resets.
        assert!(!s.tick(0.04, 0.0, &world));
        assert!(s.tick(0.05, 0.0, &world));
        assert_eq!(s.timer(), 0.0);
    }

    #[test]
    fn spawned_obstacle_is_centered_in_lane() {
        let world = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let lane_width = world.road.width / world.lane_count as f32;
        for _ in 0..200 {
            let o = Spawner::spawn(&mut rng, &world);
            assert!(o.lane < world.lane_count);
            assert!((40.0..=60.0).contains(&o.rect.width));
            assert_eq!(o.rect.height, 70.0);
            assert_eq!(o.rect.y, -90.0);
            let lane_left = world.road.left + o.lane as f32 * lane_width;
            let gap_left = o.rect.x - lane_left;
            let gap_right = lane_left + lane_width - o.rect.right();
            assert!((gap_left - gap_right).abs() < 1e-3);
            assert_eq!(o.color, world.lane_color(o.lane));
        }
    }

    #[test]
    fn every_lane_is_used() {
        let world = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[Spawner::spawn(&mut rng, &world).lane] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
