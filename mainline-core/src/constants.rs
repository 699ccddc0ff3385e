/// Git metadata directory that marks a repository root
pub const GIT_DIR_ENTRY: &str = ".git";

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_MAIN_BRANCH: &str = "main";

/// Upper bound on concurrently running repository workers
pub const DEFAULT_MAX_PARALLEL: usize = 8;
