pub mod cli;
pub mod discover;
pub mod mock;
pub mod provider;
pub mod repo;

pub use cli::CliGitProvider;
pub use discover::{DiscoveryError, default_base_dir, discover_repos};
pub use provider::GitProvider;
pub use repo::Repo;

#[cfg(test)]
pub(crate) mod test_support;
