//! Rod geometry
//!
//! A rod is an axis-aligned rectangle whose width is its numeric length
//! times the unit length. Only the position ever changes; setters shift the
//! rod so that the requested edge lands where asked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// RGBA display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RodColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RodColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Display color for each rod length, indexed by `length - 1`
pub const ROD_COLORS: [RodColor; NB_ROD_LENGTHS] = [
    RodColor::rgb(200, 200, 200), // light gray
    RodColor::rgb(230, 41, 55),   // red
    RodColor::rgb(0, 228, 48),    // green
    RodColor::rgb(200, 122, 255), // purple
    RodColor::rgb(253, 249, 0),   // yellow
    RodColor::rgb(0, 117, 44),    // dark green
    RodColor::rgb(0, 0, 0),       // black
    RodColor::rgb(127, 106, 79),  // brown
    RodColor::rgb(0, 121, 241),   // blue
    RodColor::rgb(255, 161, 0),   // orange
];

/// Axis-aligned rectangle in surface coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A draggable rod
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rod {
    rect: Rect,
    length: u8,
}

impl Rod {
    /// Create a rod of the given numeric length with its top-left corner at (x, y).
    ///
    /// Lengths are validated by the layout loader; anything outside 1..=10
    /// only matters for [`Rod::color`], which clamps.
    pub fn new(length: u8, x: f32, y: f32) -> Self {
        Self {
            rect: Rect {
                x,
                y,
                width: f32::from(length) * UNIT_ROD_LENGTH,
                height: ROD_HEIGHT,
            },
            length,
        }
    }

    /// Same rod, moved so its top-left corner sits at `pos`
    pub fn moved_to(&self, pos: Vec2) -> Self {
        let mut rod = *self;
        rod.set_top_left(pos);
        rod
    }

    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rect.height
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.rect.y + self.rect.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.rect.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect.x + self.rect.width
    }

    pub fn set_top(&mut self, top: f32) {
        self.rect.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.rect.y = bottom - self.rect.height;
    }

    pub fn set_left(&mut self, left: f32) {
        self.rect.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.rect.x = right - self.rect.width;
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn set_top_left(&mut self, pos: Vec2) {
        self.rect.x = pos.x;
        self.rect.y = pos.y;
    }

    /// Whether a point lies on the rod (left/top edges inclusive, right/bottom exclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Display color for this rod's length
    pub fn color(&self) -> RodColor {
        let index = usize::from(self.length.clamp(1, NB_ROD_LENGTHS as u8)) - 1;
        ROD_COLORS[index]
    }
}
