//! Fan the branch switch out across repositories and gather the outcomes
//! back in submission order.

use crate::{
    constants::DEFAULT_MAX_PARALLEL,
    git::{GitProvider, Repo},
    switch::{self, Operation, Outcome, Stage, Upstream},
};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    thread,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Cap on concurrent repository workers; 0 means one per repository
    pub max_parallel: usize,
    pub upstream: Upstream,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            upstream: Upstream::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoOutcome {
    pub repo: Repo,
    pub outcome: Outcome,
}

/// One entry per submitted repository, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    entries: Vec<RepoOutcome>,
}

impl BatchResult {
    /// Every repository failed at [`Stage::Launch`] with the same message,
    /// for when the batch itself could not be started.
    pub fn launch_failed(repos: &[Repo], message: &str) -> Self {
        let entries = repos
            .iter()
            .map(|repo| RepoOutcome {
                repo: repo.clone(),
                outcome: Outcome::failure(Stage::Launch, message),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RepoOutcome] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn is_all_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Run `op` against every repository concurrently and wait for all of them.
/// A failing or panicking repository never affects the others, and this
/// never fails as a whole.
pub fn run_batch(
    git: &dyn GitProvider,
    repos: &[Repo],
    op: &Operation,
    options: &BatchOptions,
) -> BatchResult {
    if repos.is_empty() {
        return BatchResult::default();
    }

    let workers = worker_count(repos.len(), options.max_parallel);
    log::info!(
        "Starting batch '{op}' over {} repos with {workers} workers",
        repos.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("mainline-worker-{i}"))
        .build();
    let outcomes = match pool {
        Ok(pool) => pool.install(|| {
            repos
                .par_iter()
                .map(|repo| run_isolated(git, repo, op, &options.upstream))
                .collect::<Vec<_>>()
        }),
        Err(e) => {
            log::warn!("Failed to build worker pool, using plain threads: {e}");
            run_on_scoped_threads(git, repos, op, &options.upstream)
        }
    };

    let entries: Vec<RepoOutcome> = repos
        .iter()
        .cloned()
        .zip(outcomes)
        .map(|(repo, outcome)| RepoOutcome { repo, outcome })
        .collect();
    let result = BatchResult { entries };

    for entry in result.entries() {
        if let Outcome::Failure { stage, message } = &entry.outcome {
            log::info!("{}: failed at {stage}: {message}", entry.repo.name);
        }
    }
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        result.succeeded(),
        result.failed()
    );

    result
}

fn worker_count(repo_count: usize, max_parallel: usize) -> usize {
    let count = if max_parallel == 0 {
        repo_count
    } else {
        repo_count.min(max_parallel)
    };
    count.max(1)
}

fn run_isolated(git: &dyn GitProvider, repo: &Repo, op: &Operation, upstream: &Upstream) -> Outcome {
    panic::catch_unwind(AssertUnwindSafe(|| switch::execute(git, repo, op, upstream)))
        .unwrap_or_else(|payload| launch_failure(repo, payload.as_ref()))
}

/// One thread per repository; used when the pool can't be built.
fn run_on_scoped_threads(
    git: &dyn GitProvider,
    repos: &[Repo],
    op: &Operation,
    upstream: &Upstream,
) -> Vec<Outcome> {
    thread::scope(|scope| {
        let handles: Vec<_> = repos
            .iter()
            .map(|repo| {
                thread::Builder::new()
                    .name(format!("mainline-{}", repo.name))
                    .spawn_scoped(scope, move || switch::execute(git, repo, op, upstream))
            })
            .collect();

        handles
            .into_iter()
            .zip(repos)
            .map(|(handle, repo)| match handle {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|payload| launch_failure(repo, payload.as_ref())),
                Err(e) => {
                    log::error!("{}: failed to start worker: {e}", repo.name);
                    Outcome::failure(Stage::Launch, format!("failed to start worker: {e}"))
                }
            })
            .collect()
    })
}

fn launch_failure(repo: &Repo, payload: &(dyn Any + Send)) -> Outcome {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    log::error!("{}: worker panicked: {detail}", repo.name);
    Outcome::failure(Stage::Launch, format!("worker panicked: {detail}"))
}
