use std::path::PathBuf;

use anyhow::Context as _;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Partial configuration file to fill in with defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let ConfigArg { config, output } = arg;
    let config = util::read_run_config(config.as_deref())?;
    config.validate().context("Invalid run configuration")?;
    Output::save_json(&config, output.as_deref())?;
    Ok(())
}
