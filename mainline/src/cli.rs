use mainline_core::{
    batch::{BatchResult, run_batch},
    config::Config,
    git::{GitProvider, Repo, default_base_dir, discover_repos},
    switch::{Operation, Outcome},
};
use serde::Serialize;
use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: i32,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        Self::system(format!("{value:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub branch: Option<String>,
    pub repos: Vec<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct RepoOutput {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    operation: String,
    succeeded: usize,
    failed: usize,
    results: &'a BatchResult,
}

/// `--dir`, else the configured `base_dir`, else the parent of the current directory.
pub fn resolve_base_dir(dir_flag: Option<&Path>, config: &Config) -> CliResult<PathBuf> {
    let base = match dir_flag {
        Some(dir) => dir.to_path_buf(),
        None => match config.resolved_base_dir()? {
            Some(dir) => dir,
            None => default_base_dir().map_err(|e| {
                CliError::system(format!("Cannot determine the current directory: {e}"))
            })?,
        },
    };
    Ok(dunce::canonicalize(&base).unwrap_or(base))
}

/// Discover repositories under `base_dir`; finding none is an error.
pub fn locate_repos(base_dir: &Path) -> CliResult<Vec<Repo>> {
    let repos = discover_repos(base_dir).map_err(|e| CliError::system(e.to_string()))?;
    if repos.is_empty() {
        return Err(CliError::user(format!(
            "No Git repositories found in {}",
            base_dir.display()
        )));
    }
    log::info!("Found {} repos in {}", repos.len(), base_dir.display());
    Ok(repos)
}

pub fn cmd_list(base_dir: &Path, json: bool) -> CliResult<()> {
    let repos = discover_repos(base_dir).map_err(|e| CliError::system(e.to_string()))?;
    let output: Vec<RepoOutput> = repos
        .into_iter()
        .map(|repo| RepoOutput {
            name: repo.name,
            path: repo.path,
        })
        .collect();

    if json {
        print_json(&output)?;
    } else {
        print!("{}", format_repo_table(&output));
    }

    Ok(())
}

pub fn cmd_run(
    config: &Config,
    git: &dyn GitProvider,
    base_dir: &Path,
    args: &RunArgs,
) -> CliResult<()> {
    let op = build_operation(args.branch.as_deref())?;
    let repos = select_repos(locate_repos(base_dir)?, &args.repos)?;

    let result = run_batch(git, &repos, &op, &config.batch.options());

    if args.json {
        print_json(&RunOutput {
            operation: op.to_string(),
            succeeded: result.succeeded(),
            failed: result.failed(),
            results: &result,
        })?;
    } else {
        print!("{}", format_results_table(&result));
    }

    if result.is_all_success() {
        Ok(())
    } else {
        Err(CliError::user(summary_line(&result)))
    }
}

pub fn build_operation(branch: Option<&str>) -> CliResult<Operation> {
    match branch {
        None => Ok(Operation::SwitchToMain),
        Some(name) => Operation::switch_and_branch(name)
            .ok_or_else(|| CliError::user("Branch name cannot be empty")),
    }
}

/// Keep the repos named in `names` (all of them when empty), in discovery order.
pub fn select_repos(repos: Vec<Repo>, names: &[String]) -> CliResult<Vec<Repo>> {
    if names.is_empty() {
        return Ok(repos);
    }
    if let Some(unknown) = names
        .iter()
        .find(|name| !repos.iter().any(|repo| &repo.name == *name))
    {
        return Err(CliError::user(format!("unknown repository '{unknown}'")));
    }
    Ok(repos
        .into_iter()
        .filter(|repo| names.contains(&repo.name))
        .collect())
}

pub fn summary_line(result: &BatchResult) -> String {
    format!(
        "{} of {} repositories failed",
        result.failed(),
        result.len()
    )
}

fn format_repo_table(repos: &[RepoOutput]) -> String {
    let name_header = "repo";
    let path_header = "path";
    let name_width = repos
        .iter()
        .map(|repo| repo.name.len())
        .max()
        .unwrap_or(name_header.len())
        .max(name_header.len());

    let mut out = String::new();
    let _ = writeln!(out, "{name_header:<name_width$}  {path_header}");
    for repo in repos {
        let _ = writeln!(out, "{:<name_width$}  {}", repo.name, repo.path.display());
    }
    out
}

pub fn format_results_table(result: &BatchResult) -> String {
    let rows: Vec<(&str, String, String)> = result
        .entries()
        .iter()
        .map(|entry| match &entry.outcome {
            Outcome::Success => (entry.repo.name.as_str(), "ok".to_string(), String::new()),
            Outcome::Failure { stage, message } => (
                entry.repo.name.as_str(),
                stage.to_string(),
                message.split_whitespace().collect::<Vec<_>>().join(" "),
            ),
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|(name, _, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("repo".len());
    let status_width = rows
        .iter()
        .map(|(_, status, _)| status.len())
        .max()
        .unwrap_or(0)
        .max("status".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:<status_width$}  detail", "repo", "status");
    for (name, status, detail) in &rows {
        let line = format!("{name:<name_width$}  {status:<status_width$}  {detail}");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?
    );
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": error.message() });
        eprintln!("{payload}");
    } else {
        eprintln!("{}", error.message());
    }
}
