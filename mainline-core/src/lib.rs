pub mod action;
pub mod batch;
pub mod config;
pub mod constants;
pub mod event;
pub mod git;
pub mod paths;
pub mod state;
pub mod switch;

// Re-export commonly used types at crate root
pub use action::Action;
pub use batch::{BatchOptions, BatchResult, RepoOutcome, run_batch};
pub use config::Config;
pub use event::AppEvent;
pub use git::{GitProvider, Repo, discover_repos};
pub use state::{ActionChoice, AppState, Mode, SelectionSet};
pub use switch::{Operation, Outcome, Stage, Upstream};
