// Plane geometry shared by the asteroid field and the fleet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from `self` in direction `angle` (radians, 0 = +X).
    pub fn offset_polar(self, angle: f32, distance: f32) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }

    pub fn distance_sq(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Vec2) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Moves `speed` units along the straight line toward `target`.
    ///
    /// The step is not clamped at the target, so a step larger than the remaining
    /// distance overshoots; callers rely on arrival radii instead. A zero-length
    /// direction leaves the point where it is.
    pub fn step_toward(self, target: Vec2, speed: f32) -> Self {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f32::EPSILON {
            return self;
        }
        Self {
            x: self.x + dx / len * speed,
            y: self.y + dy / len * speed,
        }
    }

    /// True when both axes are within `tolerance` of `other`.
    pub fn within_box(self, other: Vec2, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// Axis-aligned world rectangle with an inset margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn clamp(self, p: Vec2, margin: f32) -> Vec2 {
        Vec2 {
            x: p.x.clamp(margin, (self.width - margin).max(margin)),
            y: p.y.clamp(margin, (self.height - margin).max(margin)),
        }
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}
