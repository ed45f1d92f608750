//! Axis-aligned rectangle geometry for paddles
//!
//! A paddle is a rectangle defined by its top-left corner and size, with y
//! growing downward (screen convention).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.size.y * 0.5
    }

    /// Closest point on (or inside) the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }

    /// Whether a circle overlaps this rectangle
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        (center - closest).length_squared() < radius * radius
    }

    /// Vertical offset of `y` from the rectangle's center, normalized so the
    /// top edge is -1 and the bottom edge is 1. Values beyond the edges clamp.
    pub fn normalized_offset(&self, y: f32) -> f32 {
        let half = self.half_height();
        if half <= 0.0 {
            return 0.0;
        }
        ((y - self.center().y) / half).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_overlap_side() {
        let r = Rect::new(768.0, 205.0, 12.0, 90.0);
        // Touching the left face at mid height
        assert!(r.overlaps_circle(Vec2::new(761.0, 250.0), 8.0));
        // Just clear of it
        assert!(!r.overlaps_circle(Vec2::new(759.0, 250.0), 8.0));
    }

    #[test]
    fn test_circle_overlap_corner() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Diagonal from the corner, distance ~7.07
        assert!(r.overlaps_circle(Vec2::new(15.0, 15.0), 8.0));
        assert!(!r.overlaps_circle(Vec2::new(16.0, 16.0), 8.0));
    }

    #[test]
    fn test_normalized_offset() {
        let r = Rect::new(20.0, 205.0, 12.0, 90.0);
        assert_eq!(r.normalized_offset(250.0), 0.0);
        assert_eq!(r.normalized_offset(205.0), -1.0);
        assert_eq!(r.normalized_offset(295.0), 1.0);
        assert_eq!(r.normalized_offset(400.0), 1.0);
        assert!((r.normalized_offset(272.5) - 0.5).abs() < 1e-6);
    }
}
