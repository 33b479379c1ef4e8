//! Genetic search for fuzzy steering controllers.
//!
//! # How Training Works
//!
//! 1. **Population** - Draw random genomes (rule consequent tables)
//! 2. **Race** - Every genome drives one vehicle; all vehicles share the track
//! 3. **Fitness** - Finishers rank above everyone else, faster finishers higher
//! 4. **Selection** - Elites and tournament winners become the next parents
//! 5. **Reproduction** - Crossover of consecutive parents, then point mutation
//! 6. **Repeat** - Until enough of the population finishes a lap
//!
//! # Architecture
//!
//! ```text
//! Trainer
//!     ↓ owns
//! Population (genomes) ──→ FuzzyDriver (racefuzz-controller)
//!                              ↓ steers
//!                          Race (racefuzz-engine)
//!                              ↓ outcomes
//!                          FitnessEvaluator
//!                              ↓ scores
//! PopulationEvolver ←──────────┘
//!     ↓ rate from
//! MutationSchedule
//! ```
//!
//! # Example
//!
//! ```
//! use racefuzz_training::{
//!     config::RunConfig,
//!     trainer::{StopSignal, Trainer},
//! };
//!
//! let mut config = RunConfig { seed: Some(1), ..RunConfig::default() };
//! config.evolution.population_size = 4;
//! config.evolution.parent_count = 2;
//! config.evolution.tick_budget = 20;
//! config.evolution.max_generations = 2;
//!
//! let mut trainer = Trainer::new(config).unwrap();
//! let summary = trainer.run(&StopSignal::new());
//! assert!(summary.generations <= 2);
//! ```

pub mod config;
pub mod genetic;
pub mod history;
pub mod operators;
pub mod schedule;
pub mod trainer;
