//! Axis-aligned rectangles and aim vectors
//!
//! Screen space: origin at the top-left of the play field, +x right, +y down.
//! A rectangle is stored by center and half-extent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimError;

/// Squared distance below which two centers count as coincident
const DEGENERATE_EPSILON_SQ: f32 = 1e-6;

/// An axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Square rect around a circle of the given radius
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center, Vec2::splat(radius))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Interior intersection; rects that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.center + delta, self.half)
    }
}

/// The play field, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal and vertical containment, checked independently
    pub fn contains(&self, rect: &Rect) -> (bool, bool) {
        contains(rect, self)
    }

    /// True when the rect is inside on both axes
    pub fn contains_fully(&self, rect: &Rect) -> bool {
        self.contains(rect) == (true, true)
    }
}

/// Independent (inside_x, inside_y) containment flags of `rect` in `bounds`
pub fn contains(rect: &Rect, bounds: &Bounds) -> (bool, bool) {
    let inside_x = rect.left() >= 0.0 && rect.right() <= bounds.width;
    let inside_y = rect.top() >= 0.0 && rect.bottom() <= bounds.height;
    (inside_x, inside_y)
}

/// Unit vector pointing from `from` toward `to`
pub fn direction(from: Vec2, to: Vec2) -> Result<Vec2, SimError> {
    let delta = to - from;
    if delta.length_squared() < DEGENERATE_EPSILON_SQ {
        return Err(SimError::DegenerateDirection { from, to });
    }
    Ok(delta.normalize())
}
