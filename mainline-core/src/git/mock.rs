use super::provider::GitProvider;
use anyhow::Result;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Mutex,
    thread,
    time::Duration,
};

/// Which provider method was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStep {
    Stash,
    Fetch,
    DeleteBranch,
    Checkout,
    Pull,
    CreateBranch,
}

/// In-memory provider for tests. Calls are recorded as they complete, so
/// the order of `calls` is completion order.
#[derive(Default)]
pub struct MockGitProvider {
    /// Steps that fail for a repo, with the stderr-like message to return
    pub failures: HashMap<(PathBuf, GitStep), String>,
    /// Delay applied to a repo's fetch, to reorder worker completion
    pub fetch_delays: HashMap<PathBuf, Duration>,
    /// Repos whose fetch panics
    pub panics: HashSet<PathBuf>,
    /// Local branches per repo, consulted by `create_branch`
    pub branches: Mutex<HashMap<PathBuf, HashSet<String>>>,
    pub calls: Mutex<Vec<(PathBuf, GitStep)>>,
}

impl MockGitProvider {
    pub fn fail(mut self, repo_path: impl Into<PathBuf>, step: GitStep, message: &str) -> Self {
        self.failures
            .insert((repo_path.into(), step), message.to_string());
        self
    }

    pub fn delay_fetch(mut self, repo_path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.fetch_delays.insert(repo_path.into(), delay);
        self
    }

    pub fn panic_on_fetch(mut self, repo_path: impl Into<PathBuf>) -> Self {
        self.panics.insert(repo_path.into());
        self
    }

    pub fn with_branch(self, repo_path: impl Into<PathBuf>, branch: &str) -> Self {
        self.branches
            .lock()
            .unwrap()
            .entry(repo_path.into())
            .or_default()
            .insert(branch.to_string());
        self
    }

    /// Steps recorded for one repo, in call order
    pub fn steps_for(&self, repo_path: &Path) -> Vec<GitStep> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path == repo_path)
            .map(|(_, step)| *step)
            .collect()
    }

    fn record(&self, repo_path: &Path, step: GitStep) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((repo_path.to_path_buf(), step));
        match self.failures.get(&(repo_path.to_path_buf(), step)) {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl GitProvider for MockGitProvider {
    fn stash(&self, repo_path: &Path) -> Result<()> {
        self.record(repo_path, GitStep::Stash)
    }

    fn fetch(&self, repo_path: &Path, _remote: &str) -> Result<()> {
        if let Some(delay) = self.fetch_delays.get(repo_path) {
            thread::sleep(*delay);
        }
        assert!(
            !self.panics.contains(repo_path),
            "mock fetch panic for {}",
            repo_path.display()
        );
        self.record(repo_path, GitStep::Fetch)
    }

    fn delete_branch(&self, repo_path: &Path, _branch: &str) -> Result<()> {
        self.record(repo_path, GitStep::DeleteBranch)
    }

    fn checkout_tracking(&self, repo_path: &Path, _remote: &str, _branch: &str) -> Result<()> {
        self.record(repo_path, GitStep::Checkout)
    }

    fn pull(&self, repo_path: &Path, _remote: &str, _branch: &str) -> Result<()> {
        self.record(repo_path, GitStep::Pull)
    }

    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        self.record(repo_path, GitStep::CreateBranch)?;
        let mut branches = self.branches.lock().unwrap();
        let existing = branches.entry(repo_path.to_path_buf()).or_default();
        if !existing.insert(name.to_string()) {
            anyhow::bail!("fatal: a branch named '{name}' already exists");
        }
        Ok(())
    }
}
