//! Axis-aligned rectangle geometry
//!
//! Screen-style coordinates: x grows right, y grows down. `pos` is the
//! top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move so the bottom edge sits at `y`
    #[inline]
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Move so the top edge sits at `y`
    #[inline]
    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    /// Move so the right edge sits at `x`
    #[inline]
    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    /// Move so the left edge sits at `x`
    #[inline]
    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Same rectangle shifted by `-dx` horizontally (world to screen)
    #[inline]
    pub fn shifted_x(&self, dx: f32) -> Rect {
        Rect {
            pos: Vec2::new(self.pos.x - dx, self.pos.y),
            size: self.size,
        }
    }
}
