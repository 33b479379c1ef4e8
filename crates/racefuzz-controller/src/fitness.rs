//! Fitness: ranking a generation's vehicles after the race.
//!
//! # Lap Fitness
//!
//! ```text
//! finished                           -> finish_bonus + (tick_budget - ticks_alive)
//! crashed, and someone finished      -> 0
//! otherwise                          -> max(0, angular_progress * progress_scale)
//! ```
//!
//! The layers are strict: any finisher outranks every non-finisher, and faster
//! finishers outrank slower ones. Once a generation has a finisher, crashed
//! vehicles lose their partial-progress credit entirely, while vehicles still
//! driving when the budget ran out keep it.
//!
//! Crash penalties are applied upstream by the vehicle (wrong-way and spinning
//! vehicles have their progress forced negative), so they floor to 0 here.

use std::fmt;

use racefuzz_engine::VehicleOutcome;
use serde::{Deserialize, Serialize};

const DEFAULT_FINISH_BONUS: f32 = 100_000.0;
const DEFAULT_PROGRESS_SCALE: f32 = 1000.0;

/// Scores every vehicle of one generation.
pub trait FitnessEvaluator: fmt::Debug {
    /// Returns one score per outcome, in the same order. Higher is better.
    fn evaluate(&self, outcomes: &[VehicleOutcome], tick_budget: usize) -> Vec<f32>;
}

/// Layered finish-then-progress fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapFitness {
    pub finish_bonus: f32,
    /// Points per radian of angular progress.
    pub progress_scale: f32,
}

impl Default for LapFitness {
    fn default() -> Self {
        Self {
            finish_bonus: DEFAULT_FINISH_BONUS,
            progress_scale: DEFAULT_PROGRESS_SCALE,
        }
    }
}

impl LapFitness {
    #[expect(clippy::cast_precision_loss)]
    fn score(&self, outcome: &VehicleOutcome, tick_budget: usize, any_finished: bool) -> f32 {
        if outcome.is_finished() {
            self.finish_bonus + tick_budget.saturating_sub(outcome.ticks_alive) as f32
        } else if any_finished && outcome.is_crashed() {
            0.0
        } else {
            (outcome.angular_progress * self.progress_scale).max(0.0)
        }
    }
}

impl FitnessEvaluator for LapFitness {
    fn evaluate(&self, outcomes: &[VehicleOutcome], tick_budget: usize) -> Vec<f32> {
        let any_finished = outcomes.iter().any(VehicleOutcome::is_finished);
        outcomes
            .iter()
            .map(|o| self.score(o, tick_budget, any_finished))
            .collect()
    }
}
