use anyhow::Result;
use std::path::Path;

/// One method per git sub-operation used by the branch switch. Errors carry
/// git's own diagnostic text.
pub trait GitProvider: Send + Sync {
    fn stash(&self, repo_path: &Path) -> Result<()>;
    fn fetch(&self, repo_path: &Path, remote: &str) -> Result<()>;
    fn delete_branch(&self, repo_path: &Path, branch: &str) -> Result<()>;
    /// Check out `branch` as a local branch tracking `remote/branch`,
    /// resetting it if it already exists.
    fn checkout_tracking(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn pull(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
}
