use serde::{Deserialize, Serialize};

use crate::TrackError;

use super::Vec2;

const DEFAULT_CANVAS_WIDTH: u32 = 1000;
const DEFAULT_CANVAS_HEIGHT: u32 = 700;
const DEFAULT_TRACK_WIDTH: f32 = 100.0;
// painted road is slightly wider than the nominal track width
const DEFAULT_EDGE_MARGIN: f32 = 10.0;

const DEFAULT_CENTERLINE: [Vec2; 8] = [
    Vec2::new(150.0, 150.0),
    Vec2::new(500.0, 80.0),
    Vec2::new(850.0, 150.0),
    Vec2::new(920.0, 350.0),
    Vec2::new(850.0, 550.0),
    Vec2::new(500.0, 620.0),
    Vec2::new(150.0, 550.0),
    Vec2::new(200.0, 350.0),
];

/// Geometry of a closed course: a canvas and a centerline loop with uniform width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub track_width: f32,
    pub edge_margin: f32,
    /// Centerline points; the last point connects back to the first.
    pub centerline: Vec<Vec2>,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            track_width: DEFAULT_TRACK_WIDTH,
            edge_margin: DEFAULT_EDGE_MARGIN,
            centerline: DEFAULT_CENTERLINE.to_vec(),
        }
    }
}

impl TrackLayout {
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.centerline.len() < 2 {
            return Err(TrackError::TooFewPoints {
                count: self.centerline.len(),
            });
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(TrackError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.track_width.is_nan() || self.track_width <= 0.0 {
            return Err(TrackError::InvalidTrackWidth {
                width: self.track_width,
            });
        }
        Ok(())
    }

    /// Reference point that lap progress is measured around.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.canvas_width / 2) as f32,
            (self.canvas_height / 2) as f32,
        )
    }

    /// Closed-loop segments of the centerline.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.centerline.len();
        (0..n).map(move |i| (self.centerline[i], self.centerline[(i + 1) % n]))
    }
}

/// Rasterized passable/blocked grid of a course.
///
/// Cells are stored one bit per cell, row-major, with set bits marking road.
/// Anything outside the canvas counts as blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMask {
    width: usize,
    height: usize,
    words_per_row: usize,
    road: Vec<u64>,
}

impl TrackMask {
    /// Creates a fully blocked mask.
    #[must_use]
    pub fn blocked(width: usize, height: usize) -> Self {
        let words_per_row = width.div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            road: vec![0; words_per_row * height],
        }
    }

    /// Creates a mask where `is_road(x, y)` decides each cell.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, mut is_road: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut mask = Self::blocked(width, height);
        for y in 0..height {
            for x in 0..width {
                if is_road(x, y) {
                    mask.open_cell(x, y);
                }
            }
        }
        mask
    }

    /// Rasterizes a layout: a cell is road when it lies within half the painted
    /// width of any centerline segment.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn build(layout: &TrackLayout) -> Result<Self, TrackError> {
        layout.validate()?;
        let width = layout.canvas_width as usize;
        let height = layout.canvas_height as usize;
        let half = (layout.track_width + layout.edge_margin) / 2.0;
        let mut mask = Self::blocked(width, height);

        for (a, b) in layout.segments() {
            let x0 = (a.x.min(b.x) - half).floor().max(0.0) as usize;
            let x1 = ((a.x.max(b.x) + half).ceil().max(0.0) as usize).min(width - 1);
            let y0 = (a.y.min(b.y) - half).floor().max(0.0) as usize;
            let y1 = ((a.y.max(b.y) + half).ceil().max(0.0) as usize).min(height - 1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = Vec2::new(x as f32, y as f32);
                    if p.distance_to_segment(a, b) <= half {
                        mask.open_cell(x, y);
                    }
                }
            }
        }

        tracing::debug!(
            width,
            height,
            road_cells = mask.road_cell_count(),
            "track mask built"
        );
        Ok(mask)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks whether a cell is blocked. Out-of-bounds cells are blocked.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return true;
        }
        let word = self.road[y * self.words_per_row + x / 64];
        word & (1 << (x % 64)) == 0
    }

    /// Number of road cells.
    #[must_use]
    pub fn road_cell_count(&self) -> usize {
        self.road.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn open_cell(&mut self, x: usize, y: usize) {
        self.road[y * self.words_per_row + x / 64] |= 1 << (x % 64);
    }
}
