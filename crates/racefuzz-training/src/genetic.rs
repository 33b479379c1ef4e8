//! Generational genetic algorithm over controller genomes.
//!
//! One generation step, given a population and one score per genome:
//!
//! 1. **Elite Selection** - The `elite_count` best genomes become the first parents
//! 2. **Tournament Selection** - The remaining parent slots are filled with tournament
//!    winners drawn from the whole population
//! 3. **Crossover** - Offspring `k` is bred from `parents[k % P]` and `parents[(k + 1) % P]`
//! 4. **Mutation** - Each offspring has a rate-dependent number of genes re-randomized
//!
//! Elite slots are filled by rank, not by tournament. Selection is purely
//! tournament-based only when `elite_count` is zero.
//!
//! The next population is the parents, unchanged, followed by the offspring, so
//! its size never changes. Parents that were good enough to be selected are
//! re-evaluated in the next race rather than keeping their old score, which
//! keeps the comparison fair when the fitness of a generation depends on its
//! other members.
//!
//! # Example
//!
//! ```
//! use racefuzz_training::{
//!     genetic::{Population, PopulationEvolver},
//!     operators::CrossoverKind,
//! };
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
//! let population = Population::random(10, &mut rng, 0..4);
//! let evolver = PopulationEvolver {
//!     parent_count: 4,
//!     elite_count: 2,
//!     tournament_size: 2,
//!     crossover: CrossoverKind::SinglePoint,
//!     mutation_rate: 25.0,
//!     gene_range: 0..4,
//! };
//! let scores: Vec<f32> = (0..10).map(|i| i as f32).collect();
//! let next = evolver.evolve(&population, &scores, &mut rng);
//! assert_eq!(next.len(), 10);
//! // the best genome survives unchanged in the first slot
//! assert_eq!(next.genomes()[0], population.genomes()[9]);
//! ```

use std::ops::Range;

use racefuzz_controller::genome::Genome;
use rand::Rng;

use crate::operators::{self, CrossoverKind};

/// Genomes raced together in one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    /// Creates `count` genomes with genes drawn uniformly from `gene_range`.
    pub fn random<R>(count: usize, rng: &mut R, gene_range: Range<i32>) -> Self
    where
        R: Rng + ?Sized,
    {
        let genomes = (0..count)
            .map(|_| operators::random_genome(rng, gene_range.clone()))
            .collect();
        Self { genomes }
    }

    #[must_use]
    pub fn from_genomes(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

/// Parameters of one generation step.
///
/// The trainer builds a fresh evolver every generation so that the mutation
/// rate can follow its schedule.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Genomes carried unchanged into the next generation
    pub parent_count: usize,
    /// How many of the parents are the best genomes by score
    pub elite_count: usize,
    /// Contestants per tournament (larger = stronger selection pressure)
    pub tournament_size: usize,
    pub crossover: CrossoverKind,
    /// Percentage of an offspring's genes that are re-randomized
    pub mutation_rate: f32,
    /// Range new genes are drawn from
    pub gene_range: Range<i32>,
}

impl PopulationEvolver {
    /// Selects `parent_count` parents: the elites first, best first, then
    /// tournament winners.
    ///
    /// Elites are ranked by a stable sort, so equal scores keep population order.
    /// Tournament winners are drawn with replacement and may repeat an elite.
    ///
    /// # Panics
    ///
    /// Panics if `scores` does not have one entry per genome, or if the
    /// population is smaller than `parent_count`.
    pub fn select_parents<R>(&self, population: &Population, scores: &[f32], rng: &mut R) -> Vec<Genome>
    where
        R: Rng + ?Sized,
    {
        assert_eq!(population.len(), scores.len());
        assert!(self.parent_count <= population.len());
        assert!(self.elite_count <= self.parent_count);

        let mut ranking: Vec<usize> = (0..scores.len()).collect();
        ranking.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

        let mut parents: Vec<Genome> = ranking[..self.elite_count]
            .iter()
            .map(|i| population.genomes[*i].clone())
            .collect();
        while parents.len() < self.parent_count {
            let winner = operators::tournament_select(scores, self.tournament_size, rng);
            parents.push(population.genomes[winner].clone());
        }
        parents
    }

    /// Breeds `count` offspring from consecutive parent pairs.
    ///
    /// # Panics
    ///
    /// Panics if `parents` is empty and `count` is not zero.
    pub fn breed<R>(&self, parents: &[Genome], count: usize, rng: &mut R) -> Vec<Genome>
    where
        R: Rng + ?Sized,
    {
        let p = parents.len();
        (0..count)
            .map(|k| {
                let mut child = self.crossover.cross(&parents[k % p], &parents[(k + 1) % p], rng);
                operators::mutate(&mut child, self.mutation_rate, self.gene_range.clone(), rng);
                child
            })
            .collect()
    }

    /// Creates the next generation: parents unchanged, then offspring.
    ///
    /// # Panics
    ///
    /// See [`Self::select_parents`].
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, scores: &[f32], rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let mut genomes = self.select_parents(population, scores, rng);
        let offspring_count = population.len() - genomes.len();
        let offspring = self.breed(&genomes, offspring_count, rng);
        genomes.extend(offspring);
        Population { genomes }
    }
}
