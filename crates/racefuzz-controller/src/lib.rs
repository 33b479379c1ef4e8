//! Fuzzy steering controllers and the fitness function that ranks them.
//!
//! A controller turns five normalized sensor readings into one steering delta.
//! Its behavior is fully described by a [`Genome`](genome::Genome): 25 discrete
//! genes, one per (sensor, membership class) rule, each selecting an entry of the
//! steering-option table.
//!
//! # Architecture
//!
//! ```text
//! Sensor readings (0..=100) x5
//!     ↓ membership (5 triangular classes each)
//! Rule activations (25 = 5 sensors x 5 classes)
//!     ↓ genome selects a steering option per rule
//! Weighted average (zero-order Sugeno)
//!     ↓
//! Steering delta (degrees)
//! ```
//!
//! Once a generation has raced, [`fitness`] converts every vehicle's terminal
//! state into a scalar score for the genetic search in `racefuzz-training`.
//!
//! # Modules
//!
//! - [`membership`] - triangular membership functions
//! - [`genome`] - rule consequent table and its layout
//! - [`fuzzy`] - inference and the [`Driver`](racefuzz_engine::Driver) adapter
//! - [`fitness`] - layered lap fitness

pub mod fitness;
pub mod fuzzy;
pub mod genome;
pub mod membership;

/// Invalid controller setup, detected before any simulation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ControllerError {
    #[display("steering option table must not be empty")]
    EmptySteeringTable,
    #[display("activation threshold must be in [0, 1), got {threshold}")]
    InvalidThreshold { threshold: f32 },
}
