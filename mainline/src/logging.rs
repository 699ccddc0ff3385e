use anyhow::Context;
use log::LevelFilter;
use mainline_core::paths;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "mainline.log";

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub fn default_log_file() -> Option<PathBuf> {
    paths::cache_dir().map(|dir| dir.join(LOG_FILE_NAME))
}

/// `--debug` wins over `--log-level`/`MAINLINE_LOG`, which win over the default.
pub fn resolve_level(debug: bool, requested: Option<LevelFilter>) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        requested.unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

pub fn setup_logging(level: LevelFilter) -> anyhow::Result<PathBuf> {
    let log_file = default_log_file().context("Unable to find home directory for the log file")?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("mainline logging initialised (level={level})");
    Ok(log_file)
}
