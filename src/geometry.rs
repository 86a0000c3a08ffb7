/// Axis-aligned bounding boxes in playfield units.

use glam::Vec2;

/// Rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Bounds { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        let lo = self.min.max(other.min);
        let hi = self.max().min(other.max());
        lo.x < hi.x && lo.y < hi.y
    }
}
