//! Triangular membership functions over the normalized sensor scale.
//!
//! Five overlapping triangles cover `[0, 100]`:
//!
//! ```text
//! degree
//!   1 |VC      C      M      F      VF
//!     |\      /\     /\     /\      /
//!     | \    /  \   /  \   /  \    /
//!     |  \  /    \ /    \ /    \  /
//!     |   \/      X      X      \/
//!   0 +---+------+------+------+---- distance
//!     0   25     50     75    100
//! ```
//!
//! Neighbouring triangles cross at 0.5, so the five degrees always sum to 1.

use racefuzz_engine::READING_SCALE;

/// Number of linguistic classes per sensor.
pub const MEMBERSHIP_CLASS_COUNT: usize = 5;

/// Linguistic distance classes, ordered from nearest to farthest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MembershipClass {
    VeryClose,
    Close,
    Medium,
    Far,
    VeryFar,
}

impl MembershipClass {
    pub const ALL: [Self; MEMBERSHIP_CLASS_COUNT] = [
        Self::VeryClose,
        Self::Close,
        Self::Medium,
        Self::Far,
        Self::VeryFar,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn triangle(self) -> Triangle {
        match self {
            Self::VeryClose => Triangle::new(0.0, 0.0, 25.0),
            Self::Close => Triangle::new(0.0, 25.0, 50.0),
            Self::Medium => Triangle::new(25.0, 50.0, 75.0),
            Self::Far => Triangle::new(50.0, 75.0, 100.0),
            Self::VeryFar => Triangle::new(75.0, 100.0, 100.0),
        }
    }
}

/// Triangular membership function with feet `a`, `c` and peak `b`.
///
/// A triangle whose peak coincides with a foot is a shoulder: it is 1 at that
/// edge instead of 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: f32,
    b: f32,
    c: f32,
}

impl Triangle {
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// Membership degree of `x`, in `[0, 1]`.
    #[must_use]
    pub fn degree(self, x: f32) -> f32 {
        let Self { a, b, c } = self;
        if x < a || x > c {
            return 0.0;
        }
        if x <= b {
            if b > a { (x - a) / (b - a) } else { 1.0 }
        } else if c > b {
            (c - x) / (c - b)
        } else {
            1.0
        }
    }
}

/// Membership degrees of every class for one distance reading.
///
/// The input is clamped to `[0, READING_SCALE]` first.
///
/// # Examples
///
/// ```
/// use racefuzz_controller::membership::memberships;
///
/// assert_eq!(memberships(0.0), [1.0, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(memberships(60.0), [0.0, 0.0, 0.6, 0.4, 0.0]);
/// assert_eq!(memberships(250.0), [0.0, 0.0, 0.0, 0.0, 1.0]);
/// ```
#[must_use]
pub fn memberships(distance: f32) -> [f32; MEMBERSHIP_CLASS_COUNT] {
    let x = distance.clamp(0.0, READING_SCALE);
    MembershipClass::ALL.map(|class| class.triangle().degree(x))
}
