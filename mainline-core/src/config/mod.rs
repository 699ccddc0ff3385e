mod theme;

use crate::{
    batch::BatchOptions,
    constants::{DEFAULT_MAIN_BRANCH, DEFAULT_MAX_PARALLEL, DEFAULT_REMOTE},
    paths,
    switch::Upstream,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub use theme::{NamedColor, ThemeColor, ThemeConfig};

/// Default location of the config file, if a home directory can be found
pub fn config_file() -> Option<PathBuf> {
    paths::config_dir().map(|dir| dir.join("config.toml"))
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory whose immediate children are scanned for repositories.
    /// Supports `~` for the home directory. Defaults to the parent of the
    /// current directory:
    /// ```toml
    /// base_dir = "~/Development"
    /// ```
    pub base_dir: Option<String>,

    /// How the batch runs against each repository.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Color theme configuration.
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct BatchConfig {
    /// Maximum number of repositories processed at once; 0 for no limit.
    pub max_parallel: usize,
    /// Kill any single git command that runs longer than this.
    pub command_timeout_secs: Option<u64>,
    /// Remote fetched and tracked.
    pub remote: String,
    /// Branch every repository is brought back to.
    pub main_branch: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            command_timeout_secs: None,
            remote: DEFAULT_REMOTE.to_string(),
            main_branch: DEFAULT_MAIN_BRANCH.to_string(),
        }
    }
}

impl BatchConfig {
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            max_parallel: self.max_parallel,
            upstream: Upstream {
                remote: self.remote.clone(),
                branch: self.main_branch.clone(),
            },
        }
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// The configured base directory with `~` expanded, if one is set.
    pub fn resolved_base_dir(&self) -> Result<Option<PathBuf>> {
        let Some(raw) = self.base_dir.as_deref() else {
            return Ok(None);
        };
        let path = paths::expand_tilde(raw)
            .with_context(|| format!("Cannot expand '{raw}': home directory not found"))?;
        Ok(Some(path))
    }
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    if config.batch.remote.trim().is_empty() || config.batch.main_branch.trim().is_empty() {
        anyhow::bail!("batch.remote and batch.main_branch must not be empty");
    }
    Ok(config)
}

/// Load the config file. An explicit path must exist; the default file is
/// optional and its absence yields the defaults.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let config_file = match config_override {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => match config_file() {
            Some(path) if path.exists() => path,
            _ => {
                log::debug!("No config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };
    log::debug!("Loading config from {}", config_file.display());
    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    load_config_from_str(&contents)
        .with_context(|| format!("Invalid config file {}", config_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.base_dir.is_none());
        assert_eq!(config.batch.max_parallel, 8);
        assert_eq!(config.batch.remote, "origin");
        assert_eq!(config.batch.main_branch, "main");
        assert!(config.batch.command_timeout().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = load_config_from_str(
            r##"
base_dir = "/srv/code"

[batch]
max_parallel = 0
command_timeout_secs = 90
remote = "upstream"
main_branch = "trunk"

[theme]
accent = "cyan"
error = "#ff0000"
"##,
        )
        .unwrap();
        assert_eq!(config.base_dir.as_deref(), Some("/srv/code"));
        assert_eq!(
            config.resolved_base_dir().unwrap(),
            Some(PathBuf::from("/srv/code"))
        );
        assert_eq!(config.batch.command_timeout(), Some(Duration::from_secs(90)));

        let options = config.batch.options();
        assert_eq!(options.max_parallel, 0);
        assert_eq!(options.upstream.remote, "upstream");
        assert_eq!(options.upstream.branch, "trunk");

        assert_eq!(config.theme.accent, ThemeColor::Named(NamedColor::Cyan));
        assert_eq!(config.theme.error, ThemeColor::Rgb(255, 0, 0));
        assert_eq!(config.theme.success, ThemeColor::Named(NamedColor::Green));
    }

    #[test]
    fn test_partial_batch_section_keeps_defaults() {
        let config = load_config_from_str("[batch]\nmax_parallel = 2\n").unwrap();
        assert_eq!(config.batch.max_parallel, 2);
        assert_eq!(config.batch.remote, "origin");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(load_config_from_str("search_dirs = [\"~\"]").is_err());
        assert!(load_config_from_str("[batch]\nparallel = 2\n").is_err());
        assert!(load_config_from_str("[theme]\nborder = \"red\"\n").is_err());
    }

    #[test]
    fn test_blank_remote_rejected() {
        let err = load_config_from_str("[batch]\nremote = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{err}");
    }

    #[test]
    fn test_theme_invalid_color_rejected() {
        let err = load_config_from_str("[theme]\naccent = \"notacolor\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid color"), "Error was: {err}");
    }

    #[test]
    fn test_tilde_base_dir_expands() {
        let config = load_config_from_str("base_dir = \"~/Development\"").unwrap();
        let resolved = config.resolved_base_dir().unwrap().unwrap();
        assert!(resolved.ends_with("Development"));
        assert!(!resolved.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_config_override_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"), "{err}");
    }

    #[test]
    fn test_load_config_override_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("config.toml");
        fs::write(&file, "[batch]\nmain_branch = \"develop\"\n").unwrap();

        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.batch.main_branch, "develop");
    }

    #[test]
    fn test_load_config_reports_file_on_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("config.toml");
        fs::write(&file, "base_dir = 3\n").unwrap();

        let err = load_config(Some(&file)).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"), "{err}");
    }
}
