use serde::{Deserialize, Serialize};

use crate::core::{TrackMask, Vec2};

/// Number of distance sensors on every vehicle.
pub const SENSOR_COUNT: usize = 5;

/// Scale of normalized readings: `100.0` means nothing within range.
pub const READING_SCALE: f32 = 100.0;

const DEFAULT_SENSOR_ANGLES: [f32; SENSOR_COUNT] = [-60.0, -30.0, 0.0, 30.0, 60.0];
const DEFAULT_SENSOR_RANGE: f32 = 100.0;
const DEFAULT_SENSOR_STEP: f32 = 5.0;

/// Normalized sensor readings, one per sensor, in `[0, READING_SCALE]`.
pub type SensorReadings = [f32; SENSOR_COUNT];

/// Result of a single ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance marched before hitting something (or the sensor range).
    pub distance: f32,
    /// Sample point where the ray stopped.
    pub point: Vec2,
}

/// Ray-casting sensor layout shared by all vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorParams {
    /// Ray directions relative to the vehicle heading, in degrees.
    pub angles: [f32; SENSOR_COUNT],
    pub range: f32,
    pub step: f32,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            angles: DEFAULT_SENSOR_ANGLES,
            range: DEFAULT_SENSOR_RANGE,
            step: DEFAULT_SENSOR_STEP,
        }
    }
}

impl SensorParams {
    /// Marches a ray from `origin` along `heading` (degrees).
    ///
    /// Samples at the origin first, then every `step` units up to `range`.
    /// The first blocked or off-canvas sample ends the ray.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn cast_ray(&self, mask: &TrackMask, origin: Vec2, heading: f32) -> RayHit {
        let direction = Vec2::from_heading(heading);
        let mut length: f32 = 0.0;
        loop {
            let target = origin + direction * length;
            // truncate towards zero, like indexing pixels
            let (tx, ty) = (target.x as i32, target.y as i32);
            if mask.is_blocked(tx, ty) {
                return RayHit {
                    distance: length,
                    point: Vec2::new(tx as f32, ty as f32),
                };
            }
            if length >= self.range {
                return RayHit {
                    distance: self.range,
                    point: target,
                };
            }
            length = (length + self.step).min(self.range);
        }
    }

    /// Scales a hit distance to `[0, READING_SCALE]`.
    #[must_use]
    pub fn normalize(&self, distance: f32) -> f32 {
        (distance * (READING_SCALE / self.range)).min(READING_SCALE)
    }

    /// Casts every sensor ray for a vehicle whose sensors sit at `origin`.
    #[must_use]
    pub fn scan(
        &self,
        mask: &TrackMask,
        origin: Vec2,
        heading: f32,
    ) -> ([RayHit; SENSOR_COUNT], SensorReadings) {
        let hits = self
            .angles
            .map(|offset| self.cast_ray(mask, origin, heading + offset));
        let readings = hits.map(|hit| self.normalize(hit.distance));
        (hits, readings)
    }
}
