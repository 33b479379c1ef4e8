//! Genetic operators over genomes.
//!
//! Every operator is a free function over genomes or fitness slices, so it can be
//! tested without running a race. [`genetic::PopulationEvolver`](crate::genetic::PopulationEvolver)
//! chains them into one generation step.
//!
//! # Operations
//!
//! - **Initialization**: [`random_genome`] draws genes uniformly from a range
//! - **Selection**: [`tournament_select`] picks the fittest of `k` random contestants
//! - **Crossover**: [`single_point_crossover`] and [`uniform_crossover`]
//! - **Mutation**: [`mutate`] replaces a percentage of genes with fresh random values
//!
//! # Mutation Rate
//!
//! The rate is a percentage of the genome. It is converted to a gene count with
//! [`mutated_gene_count`], which rounds down but never returns less than one gene,
//! so even a fully annealed population keeps exploring.

use std::ops::Range;

use racefuzz_controller::genome::{GENOME_LEN, Genome};
use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

/// How two parents are combined into a child.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    /// Genes before a random cut point come from the first parent, the rest from the second.
    #[default]
    SinglePoint,
    /// Every gene comes from either parent with equal probability.
    Uniform,
}

impl CrossoverKind {
    pub fn cross<R>(self, p1: &Genome, p2: &Genome, rng: &mut R) -> Genome
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::SinglePoint => single_point_crossover(p1, p2, rng),
            Self::Uniform => uniform_crossover(p1, p2, rng),
        }
    }
}

/// Generates a genome with every gene drawn uniformly from `gene_range`.
///
/// # Panics
///
/// Panics if `gene_range` is empty.
pub fn random_genome<R>(rng: &mut R, gene_range: Range<i32>) -> Genome
where
    R: Rng + ?Sized,
{
    Genome::from_fn(|_| rng.random_range(gene_range.clone()))
}

/// Selects an index using tournament selection.
///
/// Draws `tournament_size` contestants uniformly with replacement and returns
/// the one with the highest score (the earliest drawn on ties).
///
/// # Panics
///
/// Panics if `scores` is empty or `tournament_size` is zero.
pub fn tournament_select<R>(scores: &[f32], tournament_size: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    assert!(!scores.is_empty());
    assert!(tournament_size > 0);
    let mut winner = rng.random_range(0..scores.len());
    for _ in 1..tournament_size {
        let contestant = rng.random_range(0..scores.len());
        if scores[contestant] > scores[winner] {
            winner = contestant;
        }
    }
    winner
}

/// Single-point crossover with a cut point drawn from `0..GENOME_LEN`.
pub fn single_point_crossover<R>(p1: &Genome, p2: &Genome, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    let point = rng.random_range(0..GENOME_LEN);
    cut_crossover(p1, p2, point)
}

/// Genes `..point` from `p1`, genes `point..` from `p2`.
#[must_use]
pub fn cut_crossover(p1: &Genome, p2: &Genome, point: usize) -> Genome {
    Genome::from_fn(|i| {
        if i < point {
            p1.genes()[i]
        } else {
            p2.genes()[i]
        }
    })
}

/// Uniform crossover: each gene is copied from a randomly chosen parent.
pub fn uniform_crossover<R>(p1: &Genome, p2: &Genome, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    Genome::from_fn(|i| {
        if rng.random_bool(0.5) {
            p1.genes()[i]
        } else {
            p2.genes()[i]
        }
    })
}

/// Number of genes mutated at `rate_percent` (at least one, at most all).
///
/// # Examples
///
/// ```
/// use racefuzz_training::operators::mutated_gene_count;
///
/// assert_eq!(mutated_gene_count(25.0), 6);
/// assert_eq!(mutated_gene_count(1.0), 1);
/// assert_eq!(mutated_gene_count(100.0), 25);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn mutated_gene_count(rate_percent: f32) -> usize {
    let count = (rate_percent.max(0.0) * GENOME_LEN as f32 / 100.0).floor() as usize;
    count.clamp(1, GENOME_LEN)
}

/// Replaces [`mutated_gene_count`] distinct, randomly chosen genes with values
/// drawn from `gene_range`.
///
/// # Panics
///
/// Panics if `gene_range` is empty.
pub fn mutate<R>(genome: &mut Genome, rate_percent: f32, gene_range: Range<i32>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let count = mutated_gene_count(rate_percent);
    for i in index::sample(rng, GENOME_LEN, count) {
        genome.genes_mut()[i] = rng.random_range(gene_range.clone());
    }
}
