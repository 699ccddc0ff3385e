mod cli;
mod logging;

use clap::{Parser, Subcommand};
use cli::{CliError, CliResult, RunArgs};
use log::LevelFilter;
use mainline_core::{
    config::{self, Config},
    git::{CliGitProvider, GitProvider},
    state::AppState,
};
use mainline_tui::{ExitAction, Theme};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

#[derive(Parser)]
#[command(
    version,
    about = "Switch sibling git repositories to main and pull, optionally branching off"
)]
struct Cli {
    /// Override path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory whose child repositories are offered (default: parent of the current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long, env = "MAINLINE_LOG", global = true, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered repositories
    List {
        #[arg(long)]
        json: bool,
    },
    /// Run the switch without the interactive UI
    Run {
        /// Create this branch from the freshly pulled main
        #[arg(short, long)]
        branch: Option<String>,
        /// Only run against this repository (repeatable; default: all)
        #[arg(short, long = "repo", value_name = "NAME")]
        repos: Vec<String>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = command_wants_json(cli.command.as_ref());

    let level = logging::resolve_level(cli.debug, cli.log_level);
    if let Err(error) = logging::setup_logging(level) {
        eprintln!("Warning: logging disabled: {error:#}");
    }

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            let cli_error = CliError::system(format!("{error:#}"));
            cli::print_error(&cli_error, json_errors);
            return ExitCode::from(2);
        }
    };

    let result = cli::resolve_base_dir(cli.dir.as_deref(), &config)
        .and_then(|base_dir| dispatch(cli.command, &config, &base_dir));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            cli::print_error(&error, json_errors);
            ExitCode::from(u8::try_from(error.code()).unwrap_or(2))
        }
    }
}

fn dispatch(command: Option<Commands>, config: &Config, base_dir: &Path) -> CliResult<()> {
    let git: Arc<dyn GitProvider> = Arc::new(CliGitProvider::new(config.batch.command_timeout()));

    match command {
        Some(Commands::List { json }) => cli::cmd_list(base_dir, json),
        Some(Commands::Run {
            branch,
            repos,
            json,
        }) => {
            let args = RunArgs {
                branch,
                repos,
                json,
            };
            cli::cmd_run(config, git.as_ref(), base_dir, &args)
        }
        None => run_tui(config, &git, base_dir),
    }
}

fn run_tui(config: &Config, git: &Arc<dyn GitProvider>, base_dir: &Path) -> CliResult<()> {
    let repos = cli::locate_repos(base_dir)?;
    let mut state = AppState::new(repos);
    let theme = Theme::from_config(&config.theme);

    let mut terminal = if should_disable_alt_screen() {
        // Inline viewport keeps drawing in the primary screen buffer, which makes
        // tmux capture-pane output usable for automation/debugging.
        ratatui::try_init_with_options(ratatui::TerminalOptions {
            viewport: ratatui::Viewport::Inline(20),
        })
    } else {
        ratatui::try_init()
    }
    .map_err(|e| CliError::system(format!("Failed to initialise terminal: {e}")))?;

    let result = mainline_tui::run(
        &mut terminal,
        &mut state,
        git,
        &theme,
        &config.batch.options(),
    );
    ratatui::restore();

    match result? {
        ExitAction::Quit => Ok(()),
        ExitAction::Finished(batch) => {
            print!("{}", cli::format_results_table(&batch));
            if !batch.is_all_success() {
                eprintln!("{}", cli::summary_line(&batch));
            }
            Ok(())
        }
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level '{value}'"))
}

fn command_wants_json(command: Option<&Commands>) -> bool {
    match command {
        Some(Commands::List { json } | Commands::Run { json, .. }) => *json,
        None => false,
    }
}

fn should_disable_alt_screen() -> bool {
    match std::env::var("MAINLINE_NO_ALT_SCREEN") {
        Ok(value) => {
            let value = value.trim().to_ascii_lowercase();
            !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
        }
        Err(_) => false,
    }
}
