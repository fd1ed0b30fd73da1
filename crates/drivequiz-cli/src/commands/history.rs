//! The `drivequiz history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use drivequiz_providers::config::load_config_from;

use super::on_off;

pub fn execute(
    storage_path: Option<PathBuf>,
    bank_path: Option<PathBuf>,
    clear: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let (mut history, path) = super::open_history(storage_path, &config);

    if clear {
        history.clear();
        println!("Answer history cleared.");
    }

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["Storage".to_string(), path.display().to_string()]);
    table.add_row(vec![
        "Answered correctly".to_string(),
        history.correct_ids().len().to_string(),
    ]);

    match super::load_bank(bank_path.as_deref(), &config) {
        Ok(bank) => {
            let known = bank
                .questions()
                .iter()
                .filter(|q| history.is_previously_correct(&q.id))
                .count();
            table.add_row(vec![
                "Bank coverage".to_string(),
                format!("{known} of {}", bank.len()),
            ]);
        }
        Err(e) => tracing::warn!("could not load bank for coverage: {e:#}"),
    }

    table.add_row(vec![
        "Previously-correct in retries".to_string(),
        on_off(history.get_preference()).to_string(),
    ]);
    if !history.is_persistent() {
        table.add_row(vec!["Persistence".to_string(), "unavailable".to_string()]);
    }

    println!("{table}");
    Ok(())
}
