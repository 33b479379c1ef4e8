//! Annealing schedule for the mutation rate.
//!
//! ```text
//! rate(g) = max(min_rate, trunc(initial_rate * cooling_factor^g))
//! rate(g) = max(1, min_rate, trunc(rate(g) / 2))    when more than half the population finished
//! ```
//!
//! The rate used by generation 1 is `initial_rate`; `rate_after(g, ..)` gives the
//! rate for generation `g + 1`. Annealed rates are whole percentages unless
//! `min_rate` itself is fractional.

use serde::{Deserialize, Serialize};

/// Mutation-rate schedule, in percent of the genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationSchedule {
    pub initial_rate: f32,
    pub min_rate: f32,
    /// Per-generation multiplier in `(0, 1]`.
    pub cooling_factor: f32,
}

impl MutationSchedule {
    /// Rate for the generation following `generation` (1-based), given how many
    /// of `population_size` vehicles finished in it.
    ///
    /// Halving never goes below one percent, even when `min_rate` is lower.
    ///
    /// # Examples
    ///
    /// ```
    /// use racefuzz_training::schedule::MutationSchedule;
    ///
    /// let schedule = MutationSchedule { initial_rate: 20.0, min_rate: 1.0, cooling_factor: 0.5 };
    /// assert_eq!(schedule.rate_after(1, 0, 20), 10.0);
    /// assert_eq!(schedule.rate_after(1, 15, 20), 5.0);
    /// assert_eq!(schedule.rate_after(10, 0, 20), 1.0);
    /// ```
    #[must_use]
    pub fn rate_after(&self, generation: usize, finishers: usize, population_size: usize) -> f32 {
        let exponent = i32::try_from(generation).unwrap_or(i32::MAX);
        let mut rate = (self.initial_rate * self.cooling_factor.powi(exponent))
            .trunc()
            .max(self.min_rate);
        if finishers * 2 > population_size {
            rate = (rate / 2.0).trunc().max(self.min_rate.max(1.0));
        }
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> MutationSchedule {
        MutationSchedule {
            initial_rate: 25.0,
            min_rate: 1.0,
            cooling_factor: 0.995,
        }
    }

    #[test]
    fn test_rate_is_non_increasing_and_floored() {
        let schedule = schedule();
        let mut previous = schedule.initial_rate;
        for generation in 1..=2000 {
            let rate = schedule.rate_after(generation, 0, 20);
            assert!(rate <= previous, "generation {generation}: {rate} > {previous}");
            assert!(rate >= schedule.min_rate);
            previous = rate;
        }
        assert_eq!(previous, schedule.min_rate);
    }

    #[test]
    fn test_majority_finishing_halves_rate() {
        let schedule = schedule();
        // 25 * 0.995^3 = 24.63
        let base = schedule.rate_after(3, 10, 20);
        let halved = schedule.rate_after(3, 11, 20);
        assert_eq!(base, 24.0);
        assert_eq!(halved, 12.0);
        // exactly half is not a majority
        assert_eq!(base, schedule.rate_after(3, 0, 20));
    }

    #[test]
    fn test_halving_respects_floor() {
        let schedule = MutationSchedule {
            initial_rate: 1.5,
            ..schedule()
        };
        assert_eq!(schedule.rate_after(1, 20, 20), 1.0);
    }

    #[test]
    fn test_halving_floors_at_one_percent() {
        let schedule = MutationSchedule {
            initial_rate: 1.0,
            min_rate: 0.0,
            cooling_factor: 1.0,
        };
        assert_eq!(schedule.rate_after(1, 20, 20), 1.0);
        // without a majority the lower floor applies
        let annealed = MutationSchedule {
            cooling_factor: 0.1,
            ..schedule
        };
        assert_eq!(annealed.rate_after(1, 0, 20), 0.0);
    }

    #[test]
    fn test_rates_are_whole_percentages() {
        let schedule = schedule();
        for generation in 1..=1000 {
            for finishers in [0, 15] {
                let rate = schedule.rate_after(generation, finishers, 20);
                assert_eq!(rate.fract(), 0.0, "generation {generation}: {rate}");
            }
        }
    }

    #[test]
    fn test_no_cooling() {
        let schedule = MutationSchedule {
            cooling_factor: 1.0,
            ..schedule()
        };
        assert_eq!(schedule.rate_after(500, 0, 20), 25.0);
    }
}
