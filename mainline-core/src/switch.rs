//! The per-repository step sequence: stash, fetch, drop local main, check
//! out main tracking the remote, pull, and optionally branch off.

use crate::{
    constants::{DEFAULT_MAIN_BRANCH, DEFAULT_REMOTE},
    git::{GitProvider, Repo},
};
use serde::Serialize;
use std::fmt;

/// What to run against every selected repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SwitchToMain,
    SwitchToMainAndBranch { new_branch: String },
}

impl Operation {
    /// Build the branching variant. Returns `None` for a blank name.
    pub fn switch_and_branch(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::SwitchToMainAndBranch {
            new_branch: name.to_string(),
        })
    }

    pub fn new_branch(&self) -> Option<&str> {
        match self {
            Self::SwitchToMain => None,
            Self::SwitchToMainAndBranch { new_branch } => Some(new_branch),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchToMain => f.write_str("switch to main and pull"),
            Self::SwitchToMainAndBranch { new_branch } => {
                write!(f, "switch to main, pull, and create {new_branch}")
            }
        }
    }
}

/// Remote and branch the switch converges on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub remote: String,
    pub branch: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_MAIN_BRANCH.to_string(),
        }
    }
}

/// The step at which a repository's sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Fetch,
    Checkout,
    Pull,
    BranchCreate,
    /// The worker for the repository could not run at all
    Launch,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Checkout => "checkout",
            Self::Pull => "pull",
            Self::BranchCreate => "branch-create",
            Self::Launch => "launch",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure { stage: Stage, message: String },
}

impl Outcome {
    pub fn failure(stage: Stage, message: impl Into<String>) -> Self {
        Self::Failure {
            stage,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Success => None,
            Self::Failure { stage, .. } => Some(*stage),
        }
    }
}

/// Run the full sequence for one repository. Blocks until git finishes;
/// concurrency is the caller's concern. Steps already applied are not
/// rolled back when a later one fails.
pub fn execute(git: &dyn GitProvider, repo: &Repo, op: &Operation, upstream: &Upstream) -> Outcome {
    let path = repo.path.as_path();
    let Upstream { remote, branch } = upstream;

    if let Err(e) = git.stash(path) {
        log_best_effort(repo, "stash", &e);
    }

    if let Err(e) = git.fetch(path, remote) {
        return fail(repo, Stage::Fetch, &e);
    }

    if let Err(e) = git.delete_branch(path, branch) {
        log_best_effort(repo, "delete local main", &e);
    }

    if let Err(e) = git.checkout_tracking(path, remote, branch) {
        return fail(repo, Stage::Checkout, &e);
    }

    if let Err(e) = git.pull(path, remote, branch) {
        return fail(repo, Stage::Pull, &e);
    }

    if let Some(new_branch) = op.new_branch()
        && let Err(e) = git.create_branch(path, new_branch)
    {
        return fail(repo, Stage::BranchCreate, &e);
    }

    log::debug!("{}: {op} succeeded", repo.name);
    Outcome::Success
}

fn fail(repo: &Repo, stage: Stage, error: &anyhow::Error) -> Outcome {
    log::warn!("{}: {stage} failed: {error:#}", repo.name);
    Outcome::failure(stage, format!("{error:#}"))
}

/// Expected no-op failures of best-effort steps, which are not worth a warning
const EXPECTED_BEST_EFFORT_ERRORS: &[&str] = &[
    "No local changes to save",
    "not found",
    "Cannot delete branch",
    "checked out at",
];

fn log_best_effort(repo: &Repo, step: &str, error: &anyhow::Error) {
    let message = format!("{error:#}");
    if EXPECTED_BEST_EFFORT_ERRORS
        .iter()
        .any(|expected| message.contains(expected))
    {
        log::debug!("{}: {step} skipped: {message}", repo.name);
    } else {
        log::warn!("{}: {step} failed, continuing: {message}", repo.name);
    }
}
