//! Per-generation records and notable run events.

use serde::{Deserialize, Serialize};

/// Summary of one completed generation. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// 1-based generation index
    pub generation: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub finisher_count: usize,
    /// Mutation rate (percent) the generation was bred with
    pub mutation_rate: f32,
}

impl GenerationRecord {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn new(generation: usize, scores: &[f32], finisher_count: usize, mutation_rate: f32) -> Self {
        let (best_fitness, mean_fitness) = if scores.is_empty() {
            (0.0, 0.0)
        } else {
            let best = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let mean = scores.iter().sum::<f32>() / scores.len() as f32;
            (best, mean)
        };
        Self {
            generation,
            best_fitness,
            mean_fitness,
            finisher_count,
            mutation_rate,
        }
    }
}

/// Milestones logged alongside the generation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunEvent {
    #[display("generation {generation}: first finisher (best fitness {best_fitness:.1})")]
    FirstFinisher { generation: usize, best_fitness: f32 },
    #[display("generation {generation}: converged with {finisher_count} finishers")]
    Converged {
        generation: usize,
        finisher_count: usize,
    },
    #[display("generation {generation}: generation limit reached")]
    GenerationLimit { generation: usize },
    #[display("generation {generation}: interrupted")]
    Interrupted { generation: usize },
}

/// Append-only log of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    records: Vec<GenerationRecord>,
    events: Vec<RunEvent>,
}

impl RunHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record`, logging a [`RunEvent::FirstFinisher`] the first time a
    /// generation has finishers.
    pub fn record(&mut self, record: GenerationRecord) {
        if record.finisher_count > 0 && self.first_finisher_generation().is_none() {
            self.events.push(RunEvent::FirstFinisher {
                generation: record.generation,
                best_fitness: record.best_fitness,
            });
        }
        self.records.push(record);
    }

    pub fn push_event(&mut self, event: RunEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    #[must_use]
    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn first_finisher_generation(&self) -> Option<usize> {
        self.records
            .iter()
            .find(|r| r.finisher_count > 0)
            .map(|r| r.generation)
    }
}
