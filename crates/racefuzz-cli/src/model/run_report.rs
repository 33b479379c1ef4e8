use chrono::{DateTime, Utc};
use racefuzz_training::{
    config::RunConfig,
    history::{GenerationRecord, RunEvent},
    trainer::{BestGenome, RunSummary, StopReason},
};
use serde::{Deserialize, Serialize};

/// Everything recorded about one training run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub seed: u64,
    pub stop_reason: StopReason,
    pub generations: usize,
    pub config: RunConfig,
    pub history: Vec<GenerationRecord>,
    pub events: Vec<RunEvent>,
    pub best: Option<BestGenome>,
}

impl RunReport {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, config: RunConfig, summary: RunSummary) -> Self {
        Self {
            run_id: run_id(started_at, summary.seed),
            started_at,
            duration_secs: summary.elapsed.as_secs_f64(),
            seed: summary.seed,
            stop_reason: summary.stop_reason,
            generations: summary.generations,
            config,
            history: summary.history.records().to_vec(),
            events: summary.history.events().to_vec(),
            best: summary.best,
        }
    }
}

fn run_id(started_at: DateTime<Utc>, seed: u64) -> String {
    format!("{}-{seed:016x}", started_at.format("%Y%m%dT%H%M%SZ"))
}
