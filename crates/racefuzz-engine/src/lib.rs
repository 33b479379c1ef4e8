//! Track, sensor and vehicle simulation for the racefuzz experiments.
//!
//! The engine knows nothing about fuzzy logic or genetic search. Vehicles ask a
//! [`Driver`] for a steering delta every tick, and the [`Race`] loop advances
//! every vehicle in lockstep over a shared, read-only [`Circuit`].
//!
//! - [`core`] - geometry and the rasterized [`TrackMask`]
//! - [`engine`] - sensors, vehicles and the race loop
//!
//! # Example
//!
//! ```
//! use racefuzz_engine::{Circuit, Driver, Race, SensorReadings, TrackLayout, VehicleParams};
//!
//! #[derive(Debug)]
//! struct Straight;
//!
//! impl Driver for Straight {
//!     fn steer(&self, _readings: &SensorReadings) -> f32 {
//!         0.0
//!     }
//! }
//!
//! let circuit = Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap();
//! let mut race = Race::new(&circuit, [Straight, Straight], 50);
//! race.run(|| false);
//! assert!(race.tick() <= 50);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid track or vehicle setup, detected before any simulation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrackError {
    #[display("track needs at least 2 centerline points, got {count}")]
    TooFewPoints { count: usize },
    #[display("track canvas must be non-empty, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[display("track width must be positive, got {width}")]
    InvalidTrackWidth { width: f32 },
    #[display("sensor range and step must be positive, got range {range} and step {step}")]
    InvalidSensor { range: f32, step: f32 },
    #[display("vehicle speed must be positive, got {speed}")]
    InvalidSpeed { speed: f32 },
    #[display("start position ({x}, {y}) is not on the track")]
    BlockedStart { x: f32, y: f32 },
}
