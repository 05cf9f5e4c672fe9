use glam::{Affine2, Mat2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Square box of half-width `radius` around `center`.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Inclusive overlap test; boxes sharing an edge overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// `(cos, sin)` of `quarter_turns * π/2`, exact for every multiple.
fn quarter_turn_cos_sin(quarter_turns: i32) -> (f32, f32) {
    match quarter_turns.rem_euclid(4) {
        0 => (1.0, 0.0),
        1 => (0.0, 1.0),
        2 => (-1.0, 0.0),
        _ => (0.0, -1.0),
    }
}

/// Rotation by `quarter_turns * π/2` about `pivot`.
///
/// Composed analytically as translate(pivot) · rotate · translate(-pivot):
/// `x' = (x - px)·cos - (y - py)·sin + px`, `y' = (y - py)·cos + (x - px)·sin + py`.
pub fn quarter_turn_about(pivot: Vec2, quarter_turns: i32) -> Affine2 {
    let (cos, sin) = quarter_turn_cos_sin(quarter_turns);
    let rotation = Mat2::from_cols(Vec2::new(cos, sin), Vec2::new(-sin, cos));
    let translation = pivot - rotation * pivot;
    Affine2::from_mat2_translation(rotation, translation)
}

/// Rounds each axis to the nearest multiple of `spacing`.
///
/// A non-positive spacing disables snapping.
pub fn snap_to_grid(p: Vec2, spacing: f32) -> Vec2 {
    if spacing <= 0.0 || !spacing.is_finite() {
        return p;
    }
    (p / spacing).round() * spacing
}

/// First grid line at or below `value`.
pub fn grid_floor(value: f32, spacing: f32) -> f32 {
    (value / spacing).floor() * spacing
}
