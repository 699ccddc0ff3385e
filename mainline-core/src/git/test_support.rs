use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn configure_user(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

/// Bare `origin.git` with a `main` branch, cloned to `<root>/<name>`.
pub fn init_origin_and_clone(root: &Path, name: &str) -> PathBuf {
    let seed = root.join(format!("{name}-seed"));
    fs::create_dir_all(&seed).unwrap();
    git(&seed, &["init"]);
    git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure_user(&seed);
    fs::write(seed.join("README.md"), "# test").unwrap();
    git(&seed, &["add", "."]);
    git(&seed, &["commit", "-m", "init"]);

    let origin = format!("{name}-origin.git");
    git(root, &["clone", "--bare", &seed.to_string_lossy(), &origin]);
    git(root, &["clone", &origin, name]);
    let work = root.join(name);
    configure_user(&work);
    work
}

pub fn current_branch(dir: &Path) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
