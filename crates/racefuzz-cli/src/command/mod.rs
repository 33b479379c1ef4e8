use clap::{Parser, Subcommand};

use self::{config::ConfigArg, drive::DriveArg, train::TrainArg};

mod config;
mod drive;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve fuzzy steering controllers with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Drive a single vehicle with a trained controller model
    Drive(#[clap(flatten)] DriveArg),
    /// Print the run configuration as JSON
    Config(#[clap(flatten)] ConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Drive(arg) => drive::run(&arg)?,
        Mode::Config(arg) => config::run(&arg)?,
    }
    Ok(())
}
