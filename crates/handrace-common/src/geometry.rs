//! Screen-space geometry shared by the vehicle, obstacles and renderer.
//!
//! All coordinates are pixels with the origin at the top-left corner of the
//! viewport and y growing downwards.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap test. Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }
}

/// Horizontal extent of the drivable road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackBounds {
    pub left: f32,
    pub width: f32,
}

impl TrackBounds {
    pub const fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Allowed range for the left edge of a body `body_width` wide,
    /// keeping `margin` pixels clear of both road edges.
    pub fn clamp_range(&self, body_width: f32, margin: f32) -> (f32, f32) {
        let min = self.left + margin;
        let max = self.left + self.width - body_width - margin;
        (min, max)
    }

    pub fn lane_width(&self, lane_count: usize) -> f32 {
        self.width / lane_count.max(1) as f32
    }
}

impl Default for TrackBounds {
    fn default() -> Self {
        Self::new(200.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edge_is_a_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(a.overlaps(&below));
    }

    #[test]
    fn any_gap_separates() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.01, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.5, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        assert!(!a.overlaps(&below));
        assert!(!below.overlaps(&a));
    }

    #[test]
    fn contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn clamp_range_respects_margin() {
        let road = TrackBounds::new(200.0, 400.0);
        let (min, max) = road.clamp_range(40.0, 10.0);
        assert_eq!(min, 210.0);
        assert_eq!(max, 550.0);
        assert!((road.lane_width(3) - 133.333).abs() < 0.01);
    }
}
