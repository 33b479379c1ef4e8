//! Vehicle simulation on top of the track primitives.
//!
//! - [`Circuit`] - rasterized track plus vehicle parameters, shared read-only
//! - [`SensorParams`] - ray-casting distance sensors
//! - [`Vehicle`] - kinematic car with collision, lap-progress and anti-spin rules
//! - [`Race`] - lockstep tick loop over a whole generation
//!
//! # Tick Order
//!
//! Each alive vehicle, per tick:
//!
//! 1. casts its sensor rays and crashes if any reading is below the collision threshold
//! 2. accumulates angular progress around the track center, crashing when it
//!    drives the wrong way and finishing when it has gone far enough
//! 3. asks its [`Driver`] for a steering delta and turns
//! 4. crashes if it turned a full circle without covering enough ground
//! 5. moves forward at constant speed

pub use self::{circuit::*, race::*, sensor::*, vehicle::*};

mod circuit;
mod race;
mod sensor;
mod vehicle;
