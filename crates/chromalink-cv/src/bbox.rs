//! Axis-aligned bounding boxes on the pixel grid
//!
//! Core geometry of a detection: a tight box around a region plus its integer center.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Bounding box in pixel units; `(x, y)` is the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BBox {
    /// Create a new bounding box
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Grow to include pixel `(x, y)`
    pub fn include(&mut self, x: u32, y: u32) {
        let max_x = self.right().max(x);
        let max_y = self.bottom().max(y);
        self.x = self.x.min(x);
        self.y = self.y.min(y);
        self.width = max_x - self.x + 1;
        self.height = max_y - self.y + 1;
    }

    /// Last column inside the box
    pub fn right(&self) -> u32 {
        self.x + self.width - 1
    }

    /// Last row inside the box
    pub fn bottom(&self) -> u32 {
        self.y + self.height - 1
    }

    /// Center with floor division: `(x + width / 2, y + height / 2)`
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}
