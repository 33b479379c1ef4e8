use crate::{
    TrackError,
    core::{TrackLayout, TrackMask, Vec2},
};

use super::VehicleParams;

/// Everything a race needs that never changes while it runs.
///
/// Built once per experiment and shared by reference with every vehicle of
/// every generation.
#[derive(Debug, Clone)]
pub struct Circuit {
    mask: TrackMask,
    center: Vec2,
    params: VehicleParams,
}

impl Circuit {
    /// Rasterizes `layout` and checks that `params` can drive on it.
    pub fn new(layout: &TrackLayout, params: VehicleParams) -> Result<Self, TrackError> {
        let mask = TrackMask::build(layout)?;
        Self::with_mask(mask, layout.center(), params)
    }

    /// Uses a prebuilt mask, with lap progress measured around `center`.
    #[expect(clippy::cast_possible_truncation)]
    pub fn with_mask(
        mask: TrackMask,
        center: Vec2,
        params: VehicleParams,
    ) -> Result<Self, TrackError> {
        params.validate()?;
        let start = params.start_position;
        if mask.is_blocked(start.x as i32, start.y as i32) {
            return Err(TrackError::BlockedStart {
                x: start.x,
                y: start.y,
            });
        }
        Ok(Self {
            mask,
            center,
            params,
        })
    }

    #[must_use]
    pub fn mask(&self) -> &TrackMask {
        &self.mask
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[must_use]
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }
}
