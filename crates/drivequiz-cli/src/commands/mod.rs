//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::Result;

use drivequiz_core::store::FileStore;
use drivequiz_core::{HistoryStore, QuestionBank};
use drivequiz_providers::DriveQuizConfig;

pub mod generate;
pub mod history;
pub mod init;
pub mod list_models;
pub mod preference;
pub mod take;
pub mod validate;

/// Load the bank from `path`, the configured bank, or the bundled one.
pub(crate) fn load_bank(path: Option<&Path>, config: &DriveQuizConfig) -> Result<QuestionBank> {
    match path.or(config.bank_path.as_deref()) {
        Some(p) => QuestionBank::load(p),
        None => QuestionBank::builtin(),
    }
}

/// Open the history store at `path` or the configured location.
pub(crate) fn open_history(path: Option<PathBuf>, config: &DriveQuizConfig) -> (HistoryStore, PathBuf) {
    let path = path.unwrap_or_else(|| config.storage_path());
    tracing::debug!("using storage at {}", path.display());
    let history = HistoryStore::open(Box::new(FileStore::new(&path)));
    (history, path)
}

pub(crate) fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
