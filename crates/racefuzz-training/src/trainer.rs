//! Simulate-score-evolve loop.
//!
//! A [`Trainer`] owns everything that lives for a whole run: the circuit, the
//! seeded PRNG, the current population, the mutation schedule and the history.
//! Each call to [`Trainer::run_generation`] races the current population once,
//! scores it, records the result and, unless the run has converged, replaces
//! the population with the next generation.
//!
//! Runs are reproducible: the same configuration and seed always produce the
//! same history.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use racefuzz_controller::{
    fitness::FitnessEvaluator,
    fuzzy::FuzzyController,
    genome::Genome,
};
use racefuzz_engine::{Circuit, Race, RaceEnd, VehicleOutcome};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{
    config::{ConfigError, RunConfig},
    genetic::{Population, PopulationEvolver},
    history::{GenerationRecord, RunEvent, RunHistory},
    schedule::MutationSchedule,
};

/// Cooperative cancellation flag, checked between ticks and between generations.
///
/// Clones share the same flag, so one clone can be handed to a signal handler
/// while the trainer polls another.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why [`Trainer::run`] returned.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[display("converged")]
    Converged,
    #[display("generation limit reached")]
    GenerationLimit,
    #[display("interrupted")]
    Interrupted,
}

/// Result of one completed generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub record: GenerationRecord,
    /// One score per vehicle, in population order
    pub scores: Vec<f32>,
    pub outcomes: Vec<VehicleOutcome>,
    pub race_end: RaceEnd,
    /// Enough vehicles finished; the population was not evolved.
    pub converged: bool,
}

/// Highest-scoring genome seen so far in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestGenome {
    pub generation: usize,
    pub fitness: f32,
    pub finished: bool,
    pub genome: Genome,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub stop_reason: StopReason,
    /// Completed generations
    pub generations: usize,
    pub history: RunHistory,
    pub best: Option<BestGenome>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Trainer {
    config: RunConfig,
    seed: u64,
    rng: Pcg64,
    circuit: Circuit,
    controller: FuzzyController,
    fitness: Box<dyn FitnessEvaluator>,
    schedule: MutationSchedule,
    population: Population,
    mutation_rate: f32,
    generation: usize,
    history: RunHistory,
    best: Option<BestGenome>,
}

impl Trainer {
    /// Validates `config`, rasterizes the track and seeds a random population.
    ///
    /// Without a configured seed, one is drawn from the thread RNG and logged so
    /// that the run can be replayed.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let circuit = Circuit::new(&config.track, config.vehicle.clone())?;
        let controller = FuzzyController::new(&config.controller)?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg64::seed_from_u64(seed);
        let evolution = &config.evolution;
        let population = Population::random(evolution.population_size, &mut rng, evolution.gene_range());
        let schedule = evolution.schedule();

        tracing::info!(
            seed,
            population_size = evolution.population_size,
            road_cells = circuit.mask().road_cell_count(),
            "trainer ready"
        );

        Ok(Self {
            fitness: Box::new(config.fitness.clone()),
            mutation_rate: schedule.initial_rate,
            config,
            seed,
            rng,
            circuit,
            controller,
            schedule,
            population,
            generation: 0,
            history: RunHistory::new(),
            best: None,
        })
    }

    /// Replaces the initial population.
    pub fn with_population(mut self, population: Population) -> Result<Self, ConfigError> {
        let expected = self.config.evolution.population_size;
        if population.len() != expected {
            return Err(ConfigError::PopulationSizeMismatch {
                expected,
                actual: population.len(),
            });
        }
        self.population = population;
        Ok(self)
    }

    /// Replaces the configured fitness function.
    #[must_use]
    pub fn with_fitness(mut self, fitness: Box<dyn FitnessEvaluator>) -> Self {
        self.fitness = fitness;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Mutation rate the current population was bred with.
    #[must_use]
    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    #[must_use]
    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    #[must_use]
    pub fn best(&self) -> Option<&BestGenome> {
        self.best.as_ref()
    }

    /// Races, scores and evolves the current population once.
    ///
    /// Returns `None` if `stop` was raised during the race; the interrupted
    /// generation is discarded and nothing is recorded.
    pub fn run_generation(&mut self, stop: &StopSignal) -> Option<GenerationOutcome> {
        let generation = self.generation + 1;
        let tick_budget = self.config.evolution.tick_budget;

        let (race_end, outcomes) = {
            let drivers = self
                .population
                .genomes()
                .iter()
                .map(|genome| self.controller.driver(genome));
            let mut race = Race::new(&self.circuit, drivers, tick_budget);
            let end = race.run(|| stop.is_raised());
            if end.is_interrupted() {
                tracing::warn!(generation, tick = race.tick(), "generation interrupted");
                return None;
            }
            (end, race.outcomes())
        };

        let scores = self.fitness.evaluate(&outcomes, tick_budget);
        let finishers = outcomes.iter().filter(|o| o.is_finished()).count();
        let record = GenerationRecord::new(generation, &scores, finishers, self.mutation_rate);
        self.update_best(generation, &scores, &outcomes);
        self.history.record(record.clone());
        self.generation = generation;

        let population_size = self.population.len();
        #[expect(clippy::cast_precision_loss)]
        let finished_fraction = finishers as f32 / population_size as f32;
        let converged = finished_fraction >= self.config.evolution.convergence_target;

        tracing::info!(
            generation,
            best = record.best_fitness,
            mean = record.mean_fitness,
            finishers,
            mutation_rate = record.mutation_rate,
            "generation complete"
        );

        if !converged {
            self.mutation_rate = self
                .schedule
                .rate_after(generation, finishers, population_size);
            let evolution = &self.config.evolution;
            let evolver = PopulationEvolver {
                parent_count: evolution.parent_count,
                elite_count: evolution.elitism_count,
                tournament_size: evolution.tournament_size,
                crossover: evolution.crossover,
                mutation_rate: self.mutation_rate,
                gene_range: evolution.gene_range(),
            };
            self.population = evolver.evolve(&self.population, &scores, &mut self.rng);
        }

        Some(GenerationOutcome {
            record,
            scores,
            outcomes,
            race_end,
            converged,
        })
    }

    fn update_best(&mut self, generation: usize, scores: &[f32], outcomes: &[VehicleOutcome]) {
        let Some((index, fitness)) = scores
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
        else {
            return;
        };
        if self.best.as_ref().is_some_and(|best| best.fitness >= fitness) {
            return;
        }
        self.best = Some(BestGenome {
            generation,
            fitness,
            finished: outcomes[index].is_finished(),
            genome: self.population.genomes()[index].clone(),
        });
    }

    /// Runs generations until convergence, the generation limit or `stop`.
    pub fn run(&mut self, stop: &StopSignal) -> RunSummary {
        let started = Instant::now();
        let max_generations = self.config.evolution.max_generations;

        let stop_reason = loop {
            if self.generation >= max_generations {
                self.history.push_event(RunEvent::GenerationLimit {
                    generation: self.generation,
                });
                break StopReason::GenerationLimit;
            }
            let interrupted = RunEvent::Interrupted {
                generation: self.generation + 1,
            };
            if stop.is_raised() {
                self.history.push_event(interrupted);
                break StopReason::Interrupted;
            }
            match self.run_generation(stop) {
                None => {
                    self.history.push_event(interrupted);
                    break StopReason::Interrupted;
                }
                Some(outcome) if outcome.converged => {
                    self.history.push_event(RunEvent::Converged {
                        generation: outcome.record.generation,
                        finisher_count: outcome.record.finisher_count,
                    });
                    break StopReason::Converged;
                }
                Some(_) => {}
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            %stop_reason,
            generations = self.generation,
            ?elapsed,
            "training finished"
        );

        RunSummary {
            seed: self.seed,
            stop_reason,
            generations: self.generation,
            history: self.history.clone(),
            best: self.best.clone(),
            elapsed,
        }
    }
}
