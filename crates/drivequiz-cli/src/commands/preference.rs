//! The `drivequiz preference` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;

use drivequiz_providers::config::load_config_from;

use super::on_off;

/// Requested preference value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub fn execute(
    value: Option<Switch>,
    storage_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let (mut history, _) = super::open_history(storage_path, &config);

    if let Some(value) = value {
        history.set_preference(matches!(value, Switch::On));
    }

    println!(
        "Previously-correct questions in retries: {}",
        on_off(history.get_preference())
    );
    Ok(())
}
