use super::repo::Repo;
use crate::constants::GIT_DIR_ENTRY;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// The base directory could not be listed.
#[derive(Debug)]
pub struct DiscoveryError {
    path: PathBuf,
    source: io::Error,
}

impl DiscoveryError {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to read {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// List the immediate children of `base_dir` that hold a `.git` directory,
/// sorted by name (byte order).
pub fn discover_repos(base_dir: &Path) -> Result<Vec<Repo>, DiscoveryError> {
    let base_dir = std::path::absolute(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
    let entries = fs::read_dir(&base_dir).map_err(|source| DiscoveryError {
        path: base_dir.clone(),
        source,
    })?;

    let mut repos = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry in {}: {err}", base_dir.display());
                continue;
            }
        };

        let path = entry.path();
        // A `.git` file marks a secondary worktree, not a repository root
        if !path.is_dir() || !path.join(GIT_DIR_ENTRY).is_dir() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        repos.push(Repo {
            name: name.to_string_lossy().into_owned(),
            path,
        });
    }

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!("Discovered {} repos in {}", repos.len(), base_dir.display());
    Ok(repos)
}

/// The parent of the current working directory, or the working directory
/// itself when it has no parent.
pub fn default_base_dir() -> io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.parent().map_or_else(|| cwd.clone(), Path::to_path_buf))
}
