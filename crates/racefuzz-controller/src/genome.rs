//! Genome layout: one gene per (sensor, membership class) rule.
//!
//! Genes are laid out sensor-major, so the rule for sensor `s` and class `c`
//! lives at `s * MEMBERSHIP_CLASS_COUNT + c`. The layout is fixed; saved
//! models stay valid as long as the sensor and class counts do not change.

use racefuzz_engine::SENSOR_COUNT;
use serde::{Deserialize, Serialize};

use crate::membership::{MEMBERSHIP_CLASS_COUNT, MembershipClass};

/// Number of genes in every genome.
pub const GENOME_LEN: usize = SENSOR_COUNT * MEMBERSHIP_CLASS_COUNT;

/// Position of the rule for `sensor` and `class` within a genome.
///
/// # Examples
///
/// ```
/// use racefuzz_controller::{genome::rule_index, membership::MembershipClass};
///
/// assert_eq!(rule_index(0, MembershipClass::VeryClose), 0);
/// assert_eq!(rule_index(2, MembershipClass::Medium), 12);
/// assert_eq!(rule_index(4, MembershipClass::VeryFar), 24);
/// ```
#[must_use]
pub const fn rule_index(sensor: usize, class: MembershipClass) -> usize {
    sensor * MEMBERSHIP_CLASS_COUNT + class.index()
}

/// Rule consequent table of a fuzzy controller.
///
/// Each gene is an index into the steering-option table. Any integer is
/// accepted; lookups wrap it into range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    genes: [i32; GENOME_LEN],
}

impl Genome {
    #[must_use]
    pub const fn new(genes: [i32; GENOME_LEN]) -> Self {
        Self { genes }
    }

    /// Genome with every gene set to `gene`.
    #[must_use]
    pub const fn uniform(gene: i32) -> Self {
        Self::new([gene; GENOME_LEN])
    }

    /// Builds a genome gene by gene.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> i32,
    {
        Self::new(std::array::from_fn(f))
    }

    #[must_use]
    pub fn genes(&self) -> &[i32; GENOME_LEN] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [i32; GENOME_LEN] {
        &mut self.genes
    }

    /// Gene of the rule for `sensor` and `class`.
    #[must_use]
    pub fn rule(&self, sensor: usize, class: MembershipClass) -> i32 {
        self.genes[rule_index(sensor, class)]
    }
}
