use std::{path::PathBuf, thread, time::Duration};

use anyhow::Context as _;
use chrono::Utc;
use racefuzz_training::trainer::{StopSignal, Trainer};

use crate::{
    model::{controller_model::ControllerModel, run_report::RunReport},
    util::{self, Output},
};

const DEFAULT_MODEL_NAME: &str = "fuzzy-driver";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Run configuration JSON file (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the population size
    #[arg(long)]
    population: Option<usize>,
    /// Override the generation limit
    #[arg(long)]
    max_generations: Option<usize>,
    /// Override the ticks per race
    #[arg(long)]
    tick_budget: Option<usize>,
    /// PRNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many seconds, keeping the completed generations
    #[arg(long)]
    time_limit: Option<u64>,
    /// Name stored in the controller model
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    name: String,
    /// Run report output path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Controller model output path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        config,
        population,
        max_generations,
        tick_budget,
        seed,
        time_limit,
        name,
        report,
        output,
    } = arg;

    let mut config = util::read_run_config(config.as_deref())?;
    if let Some(population) = population {
        config.evolution.population_size = *population;
    }
    if let Some(max_generations) = max_generations {
        config.evolution.max_generations = *max_generations;
    }
    if let Some(tick_budget) = tick_budget {
        config.evolution.tick_budget = *tick_budget;
    }
    if seed.is_some() {
        config.seed = *seed;
    }

    let started_at = Utc::now();
    let mut trainer = Trainer::new(config).context("Invalid run configuration")?;
    // record the seed actually used so the report can be replayed
    let mut config = trainer.config().clone();
    config.seed = Some(trainer.seed());

    let stop = StopSignal::new();
    if let Some(secs) = time_limit {
        let stop = stop.clone();
        let limit = Duration::from_secs(*secs);
        thread::spawn(move || {
            thread::sleep(limit);
            tracing::warn!(?limit, "time limit reached, stopping");
            stop.raise();
        });
    }

    let summary = trainer.run(&stop);
    for event in summary.history.events() {
        tracing::info!(%event, "run event");
    }

    let best = summary.best.clone();
    let run_report = RunReport::new(started_at, config.clone(), summary);
    if let Some(path) = report {
        Output::save_json(&run_report, Some(path.as_path()))?;
        tracing::info!(path = %path.display(), "run report written");
    }

    let Some(best) = best else {
        anyhow::bail!("No generation completed; no controller model to save");
    };
    let model = ControllerModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness: best.fitness,
        finished: best.finished,
        genome: best.genome,
        controller: config.controller,
    };
    Output::save_json(&model, output.as_deref())?;

    Ok(())
}
