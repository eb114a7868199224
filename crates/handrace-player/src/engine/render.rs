//! Software renderer for the track, obstacles and vehicle.
//!
//! Draws a [`SessionSnapshot`] into a 32-bit ARGB framebuffer. Text is not
//! rendered here; the HUD lives in the window title.

use handrace_common::{Rect, SteerIndicator, WorldConfig};

use crate::game::session::SessionSnapshot;

const BACKGROUND: u32 = 0xFF0B132B;
const ROAD: u32 = 0xFF192B4D;
const LANE_MARKER: u32 = 0xFFCBD5E1;
const WINDSHIELD: u32 = 0xFF003B47;
const WHEEL: u32 = 0xFF111111;
const LAMP_OFF: u32 = 0xFF2A2A3A;
const LAMP_STEER: u32 = 0xFF00FFE1;
const LAMP_ACCEL: u32 = 0xFF55FF55;
const LAMP_BRAKE: u32 = 0xFFFF5555;
const ERROR_BAR: u32 = 0xFFAA2222;

/// Length of one lane-marker dash; the repeat comes from `marker_period`
const DASH: f32 = 18.0;
const MARKER_WIDTH: f32 = 3.0;

/// Framebuffer with clipped rectangle fills
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF000000; width * height],
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, r: &Rect, color: u32) {
        let x0 = (r.x.floor() as i64).clamp(0, self.width as i64) as usize;
        let y0 = (r.y.floor() as i64).clamp(0, self.height as i64) as usize;
        let x1 = (r.right().ceil() as i64).clamp(0, self.width as i64) as usize;
        let y1 = (r.bottom().ceil() as i64).clamp(0, self.height as i64) as usize;
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1].fill(color);
        }
    }

    /// Darken everything to a third of its brightness
    pub fn dim(&mut self) {
        for pixel in self.pixels.iter_mut() {
            let r = (*pixel >> 16) & 0xFF;
            let g = (*pixel >> 8) & 0xFF;
            let b = *pixel & 0xFF;
            *pixel = 0xFF000000 | ((r / 3) << 16) | ((g / 3) << 8) | (b / 3);
        }
    }
}

/// Draw one frame of the game
pub fn draw(
    canvas: &mut Canvas,
    world: &WorldConfig,
    snap: &SessionSnapshot,
    lamps: SteerIndicator,
    fatal: bool,
) {
    let h = canvas.height as f32;
    canvas.clear(BACKGROUND);

    let road = world.road;
    canvas.fill_rect(&Rect::new(road.left, 0.0, road.width, h), ROAD);

    // Dashed lane dividers, phase-shifted by the scroll offset
    let lane_width = road.lane_width(world.lane_count);
    for lane in 1..world.lane_count {
        let x = road.left + lane as f32 * lane_width - MARKER_WIDTH / 2.0;
        let mut y = -snap.marker_offset;
        while y < h {
            canvas.fill_rect(&Rect::new(x, y, MARKER_WIDTH, DASH), LANE_MARKER);
            y += world.marker_period;
        }
    }

    for o in &snap.obstacles {
        canvas.fill_rect(&o.rect, o.color);
    }

    draw_vehicle(canvas, &snap.vehicle, snap.vehicle_color);

    if snap.overlay_message().is_some() {
        canvas.dim();
    }

    draw_lamps(canvas, lamps);

    if fatal {
        canvas.fill_rect(&Rect::new(0.0, 0.0, canvas.width as f32, 6.0), ERROR_BAR);
    }
}

fn draw_vehicle(canvas: &mut Canvas, car: &Rect, color: u32) {
    canvas.fill_rect(car, color);
    canvas.fill_rect(&Rect::new(car.x + 6.0, car.y + 10.0, car.width - 12.0, 16.0), WINDSHIELD);

    let rear = car.bottom() - 22.0;
    for (x, y) in [
        (car.x - 6.0, car.y + 8.0),
        (car.right(), car.y + 8.0),
        (car.x - 6.0, rear),
        (car.right(), rear),
    ] {
        canvas.fill_rect(&Rect::new(x, y, 6.0, 14.0), WHEEL);
    }
}

/// Four indicator lamps in the top-left corner: left, right, accelerate, brake
fn draw_lamps(canvas: &mut Canvas, lamps: SteerIndicator) {
    let states = [
        (lamps.left, LAMP_STEER),
        (lamps.right, LAMP_STEER),
        (lamps.accelerate, LAMP_ACCEL),
        (lamps.brake, LAMP_BRAKE),
    ];
    for (i, (on, color)) in states.into_iter().enumerate() {
        let x = 12.0 + i as f32 * 22.0;
        canvas.fill_rect(&Rect::new(x, 14.0, 16.0, 16.0), if on { color } else { LAMP_OFF });
    }
}
