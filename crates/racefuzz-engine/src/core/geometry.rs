use serde::{Deserialize, Serialize};

/// 2D point or displacement in screen coordinates (y grows downward).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::Mul,
)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector for a heading in degrees.
    ///
    /// Headings turn counter-clockwise on screen: `0` points right and `90`
    /// points up (towards negative y).
    #[must_use]
    pub fn from_heading(degrees: f32) -> Self {
        let rad = (-degrees).to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Angle of `self` as seen from `origin`, in radians (`atan2` convention).
    #[must_use]
    pub fn angle_from(self, origin: Self) -> f32 {
        let d = self - origin;
        d.y.atan2(d.x)
    }

    /// Shortest distance from `self` to the segment `a..b`.
    #[must_use]
    pub fn distance_to_segment(self, a: Self, b: Self) -> f32 {
        let ab = b - a;
        let len_sq = ab.dot(ab);
        if len_sq <= f32::EPSILON {
            return self.distance(a);
        }
        let t = ((self - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.distance(a + ab * t)
    }
}

/// Wraps an angle difference into `[-π, π]`.
#[must_use]
pub fn wrap_angle(mut radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if radians < -PI {
        radians += TAU;
    } else if radians > PI {
        radians -= TAU;
    }
    radians
}
