//! Zero-order Sugeno inference with a genome-selected consequent table.
//!
//! For every sensor `s` and membership class `c` whose degree `μ` exceeds the
//! activation threshold, the rule fires with strength `μ` and proposes the
//! steering option selected by gene `s * 5 + c`. The output is the
//! strength-weighted average of the proposals:
//!
//! ```text
//! steering = Σ μ·option[gene mod len] / Σ μ      (0 when nothing fires)
//! ```
//!
//! Because the output is a convex combination of table entries, it never leaves
//! `[min(option), max(option)]`.

use racefuzz_engine::{Driver, SensorReadings};
use serde::{Deserialize, Serialize};

use crate::{
    ControllerError,
    genome::{Genome, rule_index},
    membership::{MembershipClass, memberships},
};

const DEFAULT_STEERING_OPTIONS: [f32; 5] = [-45.0, -25.0, 0.0, 25.0, 45.0];
const DEFAULT_ACTIVATION_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Steering deltas (degrees) that genes select from.
    pub steering_options: Vec<f32>,
    /// Rules with a membership degree at or below this do not fire.
    pub activation_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            steering_options: DEFAULT_STEERING_OPTIONS.to_vec(),
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
        }
    }
}

/// Genome-independent part of the controller, shared by a whole population.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyController {
    steering_options: Vec<f32>,
    activation_threshold: f32,
}

impl FuzzyController {
    pub fn new(config: &ControllerConfig) -> Result<Self, ControllerError> {
        if config.steering_options.is_empty() {
            return Err(ControllerError::EmptySteeringTable);
        }
        let threshold = config.activation_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ControllerError::InvalidThreshold { threshold });
        }
        Ok(Self {
            steering_options: config.steering_options.clone(),
            activation_threshold: threshold,
        })
    }

    #[must_use]
    pub fn steering_options(&self) -> &[f32] {
        &self.steering_options
    }

    /// Steering option selected by `gene`, wrapping out-of-range values.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn option_for(&self, gene: i32) -> f32 {
        let len = self.steering_options.len() as i32;
        let index = gene.rem_euclid(len).unsigned_abs() as usize;
        self.steering_options[index]
    }

    /// Steering delta (degrees) for the given readings under `genome`'s rules.
    #[must_use]
    pub fn steer(&self, readings: &SensorReadings, genome: &Genome) -> f32 {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (sensor, reading) in readings.iter().enumerate() {
            let degrees = memberships(*reading);
            for class in MembershipClass::ALL {
                let degree = degrees[class.index()];
                if degree > self.activation_threshold {
                    let gene = genome.genes()[rule_index(sensor, class)];
                    weighted_sum += degree * self.option_for(gene);
                    total_weight += degree;
                }
            }
        }
        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }

    /// Pairs the controller with a genome so a vehicle can drive with it.
    #[must_use]
    pub fn driver<'a>(&'a self, genome: &'a Genome) -> FuzzyDriver<'a> {
        FuzzyDriver {
            controller: self,
            genome,
        }
    }
}

/// [`Driver`] backed by a fuzzy controller and one genome.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyDriver<'a> {
    controller: &'a FuzzyController,
    genome: &'a Genome,
}

impl FuzzyDriver<'_> {
    #[must_use]
    pub fn genome(&self) -> &Genome {
        self.genome
    }
}

impl Driver for FuzzyDriver<'_> {
    fn steer(&self, readings: &SensorReadings) -> f32 {
        self.controller.steer(readings, self.genome)
    }
}

#[cfg(test)]
mod tests {
    use crate::genome::GENOME_LEN;

    use super::*;

    fn controller() -> FuzzyController {
        FuzzyController::new(&ControllerConfig::default()).unwrap()
    }

    /// Deterministic spread of readings across the whole scale.
    fn reading_grid() -> impl Iterator<Item = SensorReadings> {
        (0..=20).map(|i| {
            #[expect(clippy::cast_precision_loss)]
            let base = i as f32 * 5.0;
            std::array::from_fn(|s| {
                #[expect(clippy::cast_precision_loss)]
                let offset = s as f32 * 17.0;
                (base + offset) % 101.0
            })
        })
    }

    #[test]
    fn test_neutral_genome_never_steers() {
        let controller = controller();
        // index 2 is the 0 degree option
        let genome = Genome::uniform(2);
        for readings in reading_grid() {
            assert_eq!(controller.steer(&readings, &genome), 0.0);
        }
    }

    #[test]
    fn test_output_stays_within_option_range() {
        let controller = controller();
        for seed in 0..50 {
            let genome = Genome::from_fn(|i| {
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let i = i as i32;
                (i * 7 + seed * 13) % 11 - 5
            });
            for readings in reading_grid() {
                let steering = controller.steer(&readings, &genome);
                assert!((-45.0..=45.0).contains(&steering), "{steering}");
            }
        }
    }

    #[test]
    fn test_uniform_genome_returns_its_option() {
        let controller = controller();
        let readings = [10.0, 40.0, 60.0, 90.0, 100.0];
        assert!((controller.steer(&readings, &Genome::uniform(0)) + 45.0).abs() < 1e-4);
        assert!((controller.steer(&readings, &Genome::uniform(4)) - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_rules_weighted_by_membership() {
        let controller = controller();
        // every sensor reads 60: medium 0.6, far 0.4
        let readings = [60.0; 5];
        let mut genes = [2; GENOME_LEN];
        for sensor in 0..5 {
            genes[rule_index(sensor, MembershipClass::Medium)] = 3; // +25
            genes[rule_index(sensor, MembershipClass::Far)] = 0; // -45
        }
        let steering = controller.steer(&readings, &Genome::new(genes));
        let expected = 0.6 * 25.0 + 0.4 * -45.0;
        assert!((steering - expected).abs() < 1e-4, "{steering}");
    }

    #[test]
    fn test_only_rules_above_threshold_fire() {
        let controller = controller();
        // reading 1: very-close 0.96, close 0.04 (below threshold)
        let readings = [1.0; 5];
        let mut genes = [2; GENOME_LEN];
        for sensor in 0..5 {
            genes[rule_index(sensor, MembershipClass::VeryClose)] = 3; // +25
            genes[rule_index(sensor, MembershipClass::Close)] = 0; // -45
        }
        let steering = controller.steer(&readings, &Genome::new(genes));
        assert!((steering - 25.0).abs() < 1e-4, "{steering}");
    }

    #[test]
    fn test_nothing_fires_yields_zero() {
        let config = ControllerConfig {
            activation_threshold: 0.99,
            ..ControllerConfig::default()
        };
        let controller = FuzzyController::new(&config).unwrap();
        // 12.5 sits exactly between very-close and close
        let readings = [12.5; 5];
        assert_eq!(controller.steer(&readings, &Genome::uniform(4)), 0.0);
    }

    #[test]
    fn test_out_of_range_genes_wrap() {
        let controller = controller();
        assert_eq!(controller.option_for(0), -45.0);
        assert_eq!(controller.option_for(4), 45.0);
        assert_eq!(controller.option_for(5), -45.0);
        assert_eq!(controller.option_for(7), 0.0);
        assert_eq!(controller.option_for(-1), 45.0);
        assert_eq!(controller.option_for(-6), 45.0);
        assert_eq!(controller.option_for(i32::MIN), controller.option_for(i32::MIN.rem_euclid(5)));
    }

    #[test]
    fn test_invalid_config() {
        let config = ControllerConfig {
            steering_options: vec![],
            ..ControllerConfig::default()
        };
        assert_eq!(
            FuzzyController::new(&config),
            Err(ControllerError::EmptySteeringTable)
        );

        let config = ControllerConfig {
            activation_threshold: 1.0,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            FuzzyController::new(&config),
            Err(ControllerError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_driver_delegates_to_controller() {
        let controller = controller();
        let genome = Genome::uniform(3);
        let driver = controller.driver(&genome);
        assert_eq!(driver.genome(), &genome);
        assert!((Driver::steer(&driver, &[50.0; 5]) - 25.0).abs() < 1e-4);
    }
}
