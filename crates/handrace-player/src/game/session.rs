//! Session / world loop
//!
//! One `Session` is one playthrough. Each tick it:
//!   1. integrates the vehicle from the control signal
//!   2. advances the scroll, distance and score accumulators
//!   3. runs the spawner and moves / culls obstacles
//!   4. checks the vehicle against every obstacle, in insertion order
//!
//! The session exclusively owns the vehicle and the obstacle list.

use rand::rngs::StdRng;
use rand::SeedableRng;

use handrace_common::{ControlSignal, Rect, VehicleConfig, WorldConfig};

use super::obstacle::{Obstacle, Spawner};
use super::vehicle::Vehicle;

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not running or paused
    Idle,
    Advanced { spawned: bool },
    /// Hit the obstacle at this index of the obstacle list
    Crashed { obstacle: usize },
}

/// Read-only view handed to the renderer after each tick
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub vehicle: Rect,
    pub vehicle_color: u32,
    pub obstacles: Vec<Obstacle>,
    pub marker_offset: f32,
    pub display_speed: u32,
    pub score: u64,
    pub distance: u64,
    pub running: bool,
    pub paused: bool,
    pub alive: bool,
}

impl SessionSnapshot {
    /// Message drawn over the track when the game is not live
    pub fn overlay_message(&self) -> Option<&'static str> {
        if !self.running {
            Some(if self.alive {
                "Press Start to Play"
            } else {
                "Crashed! Press Reset"
            })
        } else if self.paused {
            Some("Paused")
        } else {
            None
        }
    }
}

pub struct Session {
    world: WorldConfig,
    vehicle_props: VehicleConfig,
    vehicle: Vehicle,
    obstacles: Vec<Obstacle>,
    spawner: Spawner,
    scroll: f64,
    distance: f64,
    score: u64,
    running: bool,
    paused: bool,
    rng: StdRng,
}

impl Session {
    /// New session, seeded from `world.seed` when set
    pub fn new(world: WorldConfig, vehicle_props: VehicleConfig) -> Self {
        let rng = match world.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(world, vehicle_props, rng)
    }

    pub fn with_rng(world: WorldConfig, vehicle_props: VehicleConfig, rng: StdRng) -> Self {
        let (x, y) = world.vehicle_start(&vehicle_props);
        let vehicle = Vehicle::new(x, y, vehicle_props.clone());
        Self {
            world,
            vehicle_props,
            vehicle,
            obstacles: Vec::new(),
            spawner: Spawner::new(),
            scroll: 0.0,
            distance: 0.0,
            score: 0,
            running: false,
            paused: false,
            rng,
        }
    }

    // --- Commands ---

    /// Begin or resume play. Ignored after a crash.
    pub fn start(&mut self) {
        if !self.vehicle.alive {
            tracing::debug!("Start ignored: vehicle crashed, reset first");
            return;
        }
        if !self.running {
            tracing::info!("Session started");
        }
        self.running = true;
        self.paused = false;
    }

    /// Pause / resume. Ignored unless running.
    pub fn toggle_pause(&mut self) {
        if !self.running {
            return;
        }
        self.paused = !self.paused;
        tracing::info!("Session {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Fresh vehicle, empty road, zeroed counters
    pub fn reset(&mut self) {
        let (x, y) = self.world.vehicle_start(&self.vehicle_props);
        self.vehicle = Vehicle::new(x, y, self.vehicle_props.clone());
        self.obstacles.clear();
        self.spawner = Spawner::new();
        self.scroll = 0.0;
        self.distance = 0.0;
        self.score = 0;
        self.running = false;
        self.paused = false;
        tracing::info!("Session reset");
    }

    // --- Simulation ---

    pub fn tick(&mut self, dt: f32, control: &ControlSignal) -> TickOutcome {
        if !self.running || self.paused {
            return TickOutcome::Idle;
        }

        let road = self.world.road;
        self.vehicle
            .update(dt, control.steer, control.accelerate, control.brake, Some(&road));
        let speed = self.vehicle.speed;

        let w = &self.world;
        self.scroll += ((speed + w.scroll_base * w.scroll_factor) * dt) as f64;
        self.distance += (speed * dt * w.distance_scale) as f64;
        self.score += (speed * dt * w.score_scale).floor().max(0.0) as u64;

        let spawned = self.spawner.tick(dt, speed, &self.world);
        if spawned {
            let obstacle = Spawner::spawn(&mut self.rng, &self.world);
            tracing::debug!(
                "Spawned obstacle in lane {} (w={:.0}), {} on road",
                obstacle.lane,
                obstacle.rect.width,
                self.obstacles.len() + 1
            );
            self.obstacles.push(obstacle);
        }

        let advance = (self.world.obstacle_base_speed + speed * self.world.obstacle_speed_factor) * dt;
        for o in &mut self.obstacles {
            o.rect.y += advance;
        }
        let cull_y = self.world.viewport_height + self.world.cull_margin;
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.rect.y < cull_y);
        if self.obstacles.len() != before {
            tracing::trace!("Culled {} obstacles", before - self.obstacles.len());
        }

        if let Some(idx) = self.obstacles.iter().position(|o| self.vehicle.collides_with(&o.rect)) {
            self.vehicle.alive = false;
            self.running = false;
            tracing::info!(
                "Crashed into lane {} obstacle: score {}, distance {}",
                self.obstacles[idx].lane,
                self.score,
                self.distance.floor()
            );
            return TickOutcome::Crashed { obstacle: idx };
        }

        TickOutcome::Advanced { spawned }
    }

    // --- Read-only state ---

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_crashed(&self) -> bool {
        !self.vehicle.alive
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Distance travelled, in whole display units
    pub fn distance(&self) -> u64 {
        self.distance.floor() as u64
    }

    pub fn display_speed(&self) -> u32 {
        self.vehicle.display_speed()
    }

    /// Lane-marker phase for tiling dashes, in [0, marker_period)
    pub fn marker_offset(&self) -> f32 {
        self.scroll.rem_euclid(self.world.marker_period as f64) as f32
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            vehicle: self.vehicle.rect(),
            vehicle_color: self.vehicle.color(),
            obstacles: self.obstacles.clone(),
            marker_offset: self.marker_offset(),
            display_speed: self.display_speed(),
            score: self.score,
            distance: self.distance(),
            running: self.running,
            paused: self.paused,
            alive: self.vehicle.alive,
        }
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
