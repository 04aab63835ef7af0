//! Pieces shared by the binaries

use std::path::Path;

use colored::Colorize;
use explorer_core::{Result, SettingsManager};

/// Load settings from `config` when given, else from the default location
pub fn load_settings(config: Option<&Path>) -> Result<SettingsManager> {
    match config {
        Some(path) => SettingsManager::from_file(path.to_path_buf()),
        None => SettingsManager::new(&SettingsManager::default_config_dir()?),
    }
}

/// Print a fatal error with its cause chain
pub fn report_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), error);
}
