use std::path::PathBuf;

use anyhow::Context as _;
use racefuzz_controller::{fitness::FitnessEvaluator as _, fuzzy::FuzzyController};
use racefuzz_engine::{Circuit, Race, VehicleOutcome};
use serde::Serialize;

use crate::{
    model::controller_model::ControllerModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DriveArg {
    /// Controller model JSON file
    #[arg(long)]
    model: PathBuf,
    /// Run configuration JSON file providing the track and vehicle
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the ticks allowed for the lap
    #[arg(long)]
    tick_budget: Option<usize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DriveResult {
    model: String,
    tick_budget: usize,
    fitness: f32,
    #[serde(flatten)]
    outcome: VehicleOutcome,
}

pub(crate) fn run(arg: &DriveArg) -> anyhow::Result<()> {
    let DriveArg {
        model,
        config,
        tick_budget,
        output,
    } = arg;

    let model = ControllerModel::open(model)?;
    let config = util::read_run_config(config.as_deref())?;
    let tick_budget = tick_budget.unwrap_or(config.evolution.tick_budget);

    let circuit = Circuit::new(&config.track, config.vehicle.clone()).context("Invalid track")?;
    let controller = FuzzyController::new(&model.controller).context("Invalid controller model")?;
    let mut race = Race::new(&circuit, [controller.driver(&model.genome)], tick_budget);
    let end = race.run(|| false);
    let outcomes = race.outcomes();
    let fitness = config.fitness.evaluate(&outcomes, tick_budget);

    let (Some(outcome), Some(fitness)) = (outcomes.first(), fitness.first()) else {
        anyhow::bail!("race produced no outcome");
    };
    tracing::info!(
        ?end,
        status = ?outcome.status,
        ticks = outcome.ticks_alive,
        "drive finished"
    );

    let result = DriveResult {
        model: model.name,
        tick_budget,
        fitness: *fitness,
        outcome: *outcome,
    };
    Output::save_json(&result, output.as_deref())?;
    Ok(())
}
