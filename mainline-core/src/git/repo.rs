use serde::Serialize;
use std::path::PathBuf;

/// A repository found next to the working directory. Created once at
/// startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repo {
    pub name: String,
    pub path: PathBuf,
}
