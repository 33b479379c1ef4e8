//! Run configuration.
//!
//! Every section falls back to its defaults field by field, so a JSON file only
//! needs to name the values it changes:
//!
//! ```
//! use racefuzz_training::config::RunConfig;
//!
//! let config: RunConfig =
//!     serde_json::from_str(r#"{ "seed": 42, "evolution": { "population_size": 8 } }"#).unwrap();
//! assert_eq!(config.seed, Some(42));
//! assert_eq!(config.evolution.population_size, 8);
//! assert_eq!(config.evolution.parent_count, 6);
//! config.validate().unwrap();
//! ```

use std::ops::Range;

use racefuzz_controller::{
    ControllerError,
    fitness::LapFitness,
    fuzzy::{ControllerConfig, FuzzyController},
};
use racefuzz_engine::{TrackError, TrackLayout, VehicleParams};
use serde::{Deserialize, Serialize};

use crate::{operators::CrossoverKind, schedule::MutationSchedule};

const POPULATION_SIZE: usize = 20;
const PARENT_COUNT: usize = 6;
const ELITISM_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 2;

const INITIAL_GENE_LOW: i32 = 0;
const INITIAL_GENE_HIGH: i32 = 4;

const INITIAL_MUTATION_RATE: f32 = 25.0;
const MIN_MUTATION_RATE: f32 = 1.0;
const COOLING_FACTOR: f32 = 0.995;

const CONVERGENCE_TARGET: f32 = 0.95;
const TICK_BUDGET: usize = 2000;
const MAX_GENERATIONS: usize = 1000;

/// Invalid run configuration, detected before the first generation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("invalid track: {_0}")]
    #[from]
    Track(TrackError),
    #[display("invalid controller: {_0}")]
    #[from]
    Controller(ControllerError),
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("parent count must be in 1..={population_size}, got {parent_count}")]
    InvalidParentCount {
        parent_count: usize,
        population_size: usize,
    },
    #[display("elitism count {elitism_count} exceeds parent count {parent_count}")]
    TooManyElites {
        elitism_count: usize,
        parent_count: usize,
    },
    #[display("tournament size must be positive")]
    EmptyTournament,
    #[display("tick budget must be positive")]
    ZeroTickBudget,
    #[display("convergence target must be in (0, 1], got {target}")]
    InvalidConvergenceTarget { target: f32 },
    #[display("cooling factor must be in (0, 1], got {factor}")]
    InvalidCoolingFactor { factor: f32 },
    #[display("mutation rates must satisfy 0 <= min ({min}) <= initial ({initial})")]
    InvalidMutationRates { initial: f32, min: f32 },
    #[display("initial gene range {low}..{high} is empty")]
    EmptyGeneRange { low: i32, high: i32 },
    #[display("expected {expected} genomes, got {actual}")]
    PopulationSizeMismatch { expected: usize, actual: usize },
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Genomes carried unchanged into the next generation
    pub parent_count: usize,
    /// Parents chosen by rank rather than by tournament
    pub elitism_count: usize,
    pub tournament_size: usize,
    pub crossover: CrossoverKind,
    /// Inclusive lower bound of freshly drawn genes
    pub initial_gene_low: i32,
    /// Exclusive upper bound of freshly drawn genes
    pub initial_gene_high: i32,
    /// Mutation rate of the first generation, in percent of the genome
    pub initial_mutation_rate: f32,
    pub min_mutation_rate: f32,
    pub cooling_factor: f32,
    /// Fraction of the population that must finish for the run to stop
    pub convergence_target: f32,
    /// Ticks per race
    pub tick_budget: usize,
    pub max_generations: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: POPULATION_SIZE,
            parent_count: PARENT_COUNT,
            elitism_count: ELITISM_COUNT,
            tournament_size: TOURNAMENT_SIZE,
            crossover: CrossoverKind::default(),
            initial_gene_low: INITIAL_GENE_LOW,
            initial_gene_high: INITIAL_GENE_HIGH,
            initial_mutation_rate: INITIAL_MUTATION_RATE,
            min_mutation_rate: MIN_MUTATION_RATE,
            cooling_factor: COOLING_FACTOR,
            convergence_target: CONVERGENCE_TARGET,
            tick_budget: TICK_BUDGET,
            max_generations: MAX_GENERATIONS,
        }
    }
}

impl EvolutionConfig {
    #[must_use]
    pub fn gene_range(&self) -> Range<i32> {
        self.initial_gene_low..self.initial_gene_high
    }

    #[must_use]
    pub fn schedule(&self) -> MutationSchedule {
        MutationSchedule {
            initial_rate: self.initial_mutation_rate,
            min_rate: self.min_mutation_rate,
            cooling_factor: self.cooling_factor,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.parent_count == 0 || self.parent_count > self.population_size {
            return Err(ConfigError::InvalidParentCount {
                parent_count: self.parent_count,
                population_size: self.population_size,
            });
        }
        if self.elitism_count > self.parent_count {
            return Err(ConfigError::TooManyElites {
                elitism_count: self.elitism_count,
                parent_count: self.parent_count,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.tick_budget == 0 {
            return Err(ConfigError::ZeroTickBudget);
        }
        let target = self.convergence_target;
        if !(target > 0.0 && target <= 1.0) {
            return Err(ConfigError::InvalidConvergenceTarget { target });
        }
        let factor = self.cooling_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::InvalidCoolingFactor { factor });
        }
        let (initial, min) = (self.initial_mutation_rate, self.min_mutation_rate);
        if !(min >= 0.0 && min <= initial) {
            return Err(ConfigError::InvalidMutationRates { initial, min });
        }
        if self.gene_range().is_empty() {
            return Err(ConfigError::EmptyGeneRange {
                low: self.initial_gene_low,
                high: self.initial_gene_high,
            });
        }
        Ok(())
    }
}

/// Everything a training run needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// PRNG seed; drawn at startup when absent
    pub seed: Option<u64>,
    pub track: TrackLayout,
    pub vehicle: VehicleParams,
    pub controller: ControllerConfig,
    pub fitness: LapFitness,
    pub evolution: EvolutionConfig,
}

impl RunConfig {
    /// Checks every section without building the track mask.
    ///
    /// A start position off the track is only detected once the mask exists,
    /// by [`Trainer::new`](crate::trainer::Trainer::new).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.track.validate()?;
        self.vehicle.validate()?;
        FuzzyController::new(&self.controller)?;
        self.evolution.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RunConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.evolution.gene_range(), 0..4);
        assert_eq!(config.evolution.max_generations, 1000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_default_json_roundtrips() {
        let config = RunConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        let empty: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, config);
    }

    fn evolution_error(f: impl FnOnce(&mut EvolutionConfig)) -> ConfigError {
        let mut config = EvolutionConfig::default();
        f(&mut config);
        config.validate().unwrap_err()
    }

    #[test]
    fn test_invalid_evolution_parameters() {
        assert_eq!(
            evolution_error(|c| c.population_size = 0),
            ConfigError::EmptyPopulation
        );
        assert!(matches!(
            evolution_error(|c| c.parent_count = 0),
            ConfigError::InvalidParentCount { .. }
        ));
        assert!(matches!(
            evolution_error(|c| c.parent_count = 21),
            ConfigError::InvalidParentCount { .. }
        ));
        assert!(matches!(
            evolution_error(|c| c.elitism_count = 7),
            ConfigError::TooManyElites { .. }
        ));
        assert_eq!(
            evolution_error(|c| c.tournament_size = 0),
            ConfigError::EmptyTournament
        );
        assert_eq!(
            evolution_error(|c| c.tick_budget = 0),
            ConfigError::ZeroTickBudget
        );
        for target in [0.0, 1.5, f32::NAN] {
            assert!(matches!(
                evolution_error(|c| c.convergence_target = target),
                ConfigError::InvalidConvergenceTarget { .. }
            ));
        }
        for factor in [0.0, 1.01] {
            assert!(matches!(
                evolution_error(|c| c.cooling_factor = factor),
                ConfigError::InvalidCoolingFactor { .. }
            ));
        }
        assert!(matches!(
            evolution_error(|c| c.min_mutation_rate = 30.0),
            ConfigError::InvalidMutationRates { .. }
        ));
        assert!(matches!(
            evolution_error(|c| c.min_mutation_rate = -1.0),
            ConfigError::InvalidMutationRates { .. }
        ));
        assert_eq!(
            evolution_error(|c| c.initial_gene_high = 0),
            ConfigError::EmptyGeneRange { low: 0, high: 0 }
        );
    }

    #[test]
    fn test_boundary_values_are_valid() {
        let config = EvolutionConfig {
            population_size: 1,
            parent_count: 1,
            elitism_count: 1,
            tournament_size: 1,
            convergence_target: 1.0,
            cooling_factor: 1.0,
            initial_mutation_rate: 1.0,
            min_mutation_rate: 1.0,
            ..EvolutionConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_nested_errors_are_wrapped() {
        let mut config = RunConfig::default();
        config.track.centerline.truncate(1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Track(TrackError::TooFewPoints { count: 1 }))
        );

        let mut config = RunConfig::default();
        config.controller.steering_options.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::Controller(ControllerError::EmptySteeringTable))
        );
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "invalid controller: steering option table must not be empty"
        );
    }
}
