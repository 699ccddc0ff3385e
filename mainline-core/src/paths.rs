use std::path::PathBuf;

pub const APP_NAME: &str = "mainline";

/// Expand a leading `~` to the user's home directory.
///
/// Returns `None` when the path starts with `~` but the home directory
/// cannot be determined. Non-tilde paths are always returned as-is.
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if path == "~" {
        dirs::home_dir()
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}

/// `$XDG_CONFIG_HOME/mainline`, falling back to `~/.config/mainline` (also on
/// macOS, rather than `~/Library/Application Support`).
pub fn config_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/mainline`, falling back to `~/.cache/mainline`.
pub fn cache_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    let from_env = std::env::var(var).ok();
    resolve_xdg_dir(from_env.as_deref(), dirs::home_dir(), home_fallback)
}

fn resolve_xdg_dir(
    from_env: Option<&str>,
    home: Option<PathBuf>,
    home_fallback: &str,
) -> Option<PathBuf> {
    if let Some(dir) = from_env
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir).join(APP_NAME));
    }
    home.map(|home| home.join(home_fallback).join(APP_NAME))
}
