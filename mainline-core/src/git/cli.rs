use super::provider::GitProvider;
use anyhow::Result;
use std::{
    io::Read,
    path::Path,
    process::{Command, Output, Stdio},
    thread,
    time::{Duration, Instant},
};

const TIMEOUT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs the `git` binary. With a timeout set, a command that has not exited
/// in time is killed and reported as failed.
#[derive(Debug, Clone, Default)]
pub struct CliGitProvider {
    timeout: Option<Duration>,
}

impl CliGitProvider {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn run(&self, repo_path: &Path, args: &[&str]) -> Result<()> {
        let display = args.join(" ");
        log::debug!("git {display} (in {})", repo_path.display());

        let output = match self.timeout {
            Some(timeout) => run_with_timeout(repo_path, args, timeout)?,
            None => git_command(repo_path, args).output()?,
        };

        if !output.status.success() {
            anyhow::bail!("git {display} failed: {}", failure_detail(&output));
        }

        Ok(())
    }
}

impl GitProvider for CliGitProvider {
    fn stash(&self, repo_path: &Path) -> Result<()> {
        self.run(repo_path, &["stash"])
    }

    fn fetch(&self, repo_path: &Path, remote: &str) -> Result<()> {
        self.run(repo_path, &["fetch", remote])
    }

    fn delete_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        self.run(repo_path, &["branch", "-D", branch])
    }

    fn checkout_tracking(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        // -B so a main that could not be deleted (because it is checked out)
        // gets reset onto the remote instead of failing
        let upstream = format!("{remote}/{branch}");
        self.run(repo_path, &["checkout", "-B", branch, "--track", &upstream])
    }

    fn pull(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(repo_path, &["pull", remote, branch])
    }

    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        self.run(repo_path, &["checkout", "-b", name])
    }
}

fn git_command(repo_path: &Path, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command
        .args(args)
        .current_dir(repo_path)
        // Credential prompts would block the worker forever
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null());
    command
}

fn run_with_timeout(repo_path: &Path, args: &[&str], timeout: Duration) -> Result<Output> {
    let mut child = git_command(repo_path, args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain pipes on their own threads so a chatty command can't fill the
    // pipe buffer and stall before exiting
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || read_pipe(stdout));
    let stderr_reader = thread::spawn(move || read_pipe(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            anyhow::bail!(
                "git {} timed out after {}s",
                args.join(" "),
                timeout.as_secs()
            );
        }
        thread::sleep(TIMEOUT_POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

fn read_pipe<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

/// Best available explanation for a failed command: stderr, then stdout,
/// then the exit status.
fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    output.status.to_string()
}
