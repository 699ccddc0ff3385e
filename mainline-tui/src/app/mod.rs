mod actions;
mod spawn;

use crate::{components, keymap, theme::Theme};
use actions::{
    handle_confirm, handle_delete_char, handle_go_back, handle_input_char, handle_toggle_all,
    handle_toggle_selected,
};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use mainline_core::{
    action::Action,
    batch::{BatchOptions, BatchResult},
    event::AppEvent,
    git::GitProvider,
    state::{AppState, Mode},
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use std::{
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

/// How the TUI ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitAction {
    /// Left before any batch ran
    Quit,
    /// Left from the results screen
    Finished(BatchResult),
}

/// Handle for dispatching background work
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSender {
    /// Send an event from a background thread to the main loop
    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    theme: &Theme,
    options: &BatchOptions,
) -> anyhow::Result<ExitAction> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let event_sender = EventSender { tx };
    let spinner_start = Instant::now();

    loop {
        terminal.draw(|f| draw(f, state, theme, &spinner_start))?;

        // Check background channel (non-blocking)
        if let Ok(app_event) = rx.try_recv() {
            process_app_event(app_event, state);
            continue;
        }

        // Poll terminal events with a timeout so we can update spinner + check channel
        if event::poll(Duration::from_millis(80))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(result) = process_key(key, state, git, &event_sender, options) {
                return Ok(result);
            }
        }
    }
}

/// The batch always runs to completion, so every key is ignored while
/// processing, Ctrl+C included.
fn process_key(
    key: KeyEvent,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    options: &BatchOptions,
) -> Option<ExitAction> {
    if state.mode == Mode::Processing {
        return None;
    }

    // Clear error on any keypress
    state.error = None;

    let action = keymap::resolve_action(key, state)?;
    process_action(action, state, git, sender, options)
}

fn draw(f: &mut Frame, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let error_height = u16::from(state.error.is_some());
    let chunks = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(error_height),
        Constraint::Length(1),
    ])
    .split(f.area());
    let main_area = chunks[0];

    match state.mode {
        Mode::ChooseAction => components::action_list::draw(f, main_area, state, theme),
        Mode::ChooseRepositories => components::repo_select::draw(f, main_area, state, theme),
        Mode::EnterBranchName => components::branch_input::draw(f, main_area, state, theme),
        Mode::Processing => {
            components::processing::draw(f, main_area, state, theme, spinner_start);
        }
        Mode::ShowResults => components::results::draw(f, main_area, state, theme),
    }

    if state.error.is_some() {
        components::error_bar::draw(f, chunks[1], state, theme);
    }
    components::footer::draw(f, chunks[2], state, theme);
}

/// Handle events from background tasks
fn process_app_event(event: AppEvent, state: &mut AppState) {
    match event {
        AppEvent::BatchCompleted(result) => {
            log::debug!(
                "Batch completed: {} succeeded, {} failed",
                result.succeeded(),
                result.failed()
            );
            state.batch = Some(result);
            state.cursor = 0;
            state.mode = Mode::ShowResults;
        }
    }
}

fn process_action(
    action: Action,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    options: &BatchOptions,
) -> Option<ExitAction> {
    match action {
        Action::Quit => return Some(exit_action(state)),
        Action::MoveSelection(delta) => state.move_cursor(delta),
        Action::Confirm => handle_confirm(state, git, sender, options),
        Action::GoBack => handle_go_back(state),
        Action::ToggleSelected => handle_toggle_selected(state),
        Action::ToggleAll => handle_toggle_all(state),
        Action::InputChar(c) => handle_input_char(state, c),
        Action::DeleteChar => handle_delete_char(state),
    }
    None
}

fn exit_action(state: &AppState) -> ExitAction {
    match (&state.mode, &state.batch) {
        (Mode::ShowResults, Some(result)) => ExitAction::Finished(result.clone()),
        _ => ExitAction::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::actions::{EMPTY_BRANCH_NAME_ERROR, EMPTY_SELECTION_ERROR};
    use crossterm::event::{KeyCode, KeyModifiers};
    use mainline_core::{
        git::{
            Repo,
            mock::{GitStep, MockGitProvider},
        },
        state::ActionChoice,
        switch::{Operation, Stage},
    };
    use std::path::PathBuf;

    fn make_repos(names: &[&str]) -> Vec<Repo> {
        names
            .iter()
            .map(|name| Repo {
                name: (*name).to_string(),
                path: PathBuf::from(format!("/tmp/{name}")),
            })
            .collect()
    }

    fn make_sender() -> (EventSender, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let sender = EventSender { tx };
        (sender, rx)
    }

    struct Harness {
        state: AppState,
        mock: Arc<MockGitProvider>,
        git: Arc<dyn GitProvider>,
        sender: EventSender,
        rx: mpsc::Receiver<AppEvent>,
        options: BatchOptions,
    }

    impl Harness {
        fn new(names: &[&str]) -> Self {
            Self::with_git(names, MockGitProvider::default())
        }

        fn with_git(names: &[&str], mock: MockGitProvider) -> Self {
            let mock = Arc::new(mock);
            let git: Arc<dyn GitProvider> = mock.clone();
            let (sender, rx) = make_sender();
            Self {
                state: AppState::new(make_repos(names)),
                mock,
                git,
                sender,
                rx,
                options: BatchOptions::default(),
            }
        }

        fn act(&mut self, action: Action) -> Option<ExitAction> {
            // The run loop clears the error before every key
            self.state.error = None;
            process_action(
                action,
                &mut self.state,
                &self.git,
                &self.sender,
                &self.options,
            )
        }

        fn key(&mut self, key: KeyEvent) -> Option<ExitAction> {
            process_key(key, &mut self.state, &self.git, &self.sender, &self.options)
        }

        fn wait_for_batch(&mut self) {
            let event = self
                .rx
                .recv_timeout(Duration::from_secs(5))
                .expect("batch should complete");
            process_app_event(event, &mut self.state);
        }
    }

    #[test]
    fn test_initial_mode_is_choose_action() {
        let harness = Harness::new(&["alpha"]);
        assert_eq!(harness.state.mode, Mode::ChooseAction);
        assert!(harness.state.selection.is_empty());
    }

    #[test]
    fn test_confirm_action_selects_every_repo() {
        let mut h = Harness::new(&["alpha", "beta", "gamma"]);
        h.act(Action::MoveSelection(1));
        assert!(h.act(Action::Confirm).is_none());

        assert_eq!(h.state.mode, Mode::ChooseRepositories);
        assert_eq!(h.state.action, ActionChoice::SwitchToMainAndBranch);
        assert!(h.state.selection.is_full());
        assert_eq!(h.state.cursor, 0);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut h = Harness::new(&["alpha", "beta"]);
        h.act(Action::Confirm);
        h.act(Action::ToggleAll);
        assert!(h.state.selection.is_empty());

        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::ChooseRepositories);
        assert_eq!(h.state.error.as_deref(), Some(EMPTY_SELECTION_ERROR));
        assert!(h.rx.try_recv().is_err());

        // Shown once, gone after the next key
        h.act(Action::MoveSelection(1));
        assert!(h.state.error.is_none());
    }

    #[test]
    fn test_toggle_at_cursor() {
        let mut h = Harness::new(&["alpha", "beta", "gamma"]);
        h.act(Action::Confirm);
        h.act(Action::MoveSelection(1));
        h.act(Action::ToggleSelected);

        assert!(h.state.selection.is_selected(0));
        assert!(!h.state.selection.is_selected(1));
        assert!(h.state.selection.is_selected(2));

        // toggle-all from a partial selection selects everything
        h.act(Action::ToggleAll);
        assert!(h.state.selection.is_full());
    }

    #[test]
    fn test_toggles_ignored_outside_repo_screen() {
        let mut h = Harness::new(&["alpha"]);
        h.act(Action::ToggleSelected);
        h.act(Action::ToggleAll);
        assert!(h.state.selection.is_empty());
        assert_eq!(h.state.mode, Mode::ChooseAction);
    }

    #[test]
    fn test_back_from_repos_clears_selection() {
        let mut h = Harness::new(&["alpha", "beta"]);
        h.act(Action::Confirm);
        h.act(Action::GoBack);

        assert_eq!(h.state.mode, Mode::ChooseAction);
        assert!(h.state.selection.is_empty());
        assert_eq!(h.state.cursor, 0);
    }

    #[test]
    fn test_back_from_branch_name_keeps_selection() {
        let mut h = Harness::new(&["alpha", "beta", "gamma"]);
        h.act(Action::MoveSelection(1));
        h.act(Action::Confirm);
        h.act(Action::ToggleSelected);
        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::EnterBranchName);

        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::ChooseRepositories);
        assert_eq!(h.state.selection.count(), 2);
        assert!(!h.state.selection.is_selected(0));
    }

    #[test]
    fn test_blank_branch_name_is_rejected() {
        let mut h = Harness::new(&["alpha"]);
        h.act(Action::MoveSelection(1));
        h.act(Action::Confirm);
        h.act(Action::Confirm);

        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::EnterBranchName);
        assert_eq!(h.state.error.as_deref(), Some(EMPTY_BRANCH_NAME_ERROR));

        h.act(Action::InputChar(' '));
        h.act(Action::InputChar(' '));
        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::EnterBranchName);
        assert_eq!(h.state.error.as_deref(), Some(EMPTY_BRANCH_NAME_ERROR));
        assert!(h.rx.try_recv().is_err());
    }

    #[test]
    fn test_branch_name_editing() {
        let mut h = Harness::new(&["alpha"]);
        h.act(Action::MoveSelection(1));
        h.act(Action::Confirm);
        h.act(Action::Confirm);

        for c in "featx".chars() {
            h.act(Action::InputChar(c));
        }
        h.act(Action::DeleteChar);
        h.act(Action::InputChar('\u{7}'));
        assert_eq!(h.state.branch_name, "feat");
    }

    #[test]
    fn test_switch_to_main_runs_batch_and_shows_results() {
        let repos = make_repos(&["alpha", "beta", "gamma"]);
        let mock = MockGitProvider::default()
            .delay_fetch(&repos[0].path, Duration::from_millis(100))
            .fail(&repos[1].path, GitStep::Fetch, "fatal: no route to host");
        let mut h = Harness::with_git(&["alpha", "beta", "gamma"], mock);

        h.act(Action::Confirm);
        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::Processing);
        assert_eq!(h.state.operation, Some(Operation::SwitchToMain));

        h.wait_for_batch();
        assert_eq!(h.state.mode, Mode::ShowResults);
        let result = h.state.batch.as_ref().unwrap();
        let names: Vec<&str> = result
            .entries()
            .iter()
            .map(|entry| entry.repo.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
        assert_eq!(
            result.entries()[1].outcome.failed_stage(),
            Some(Stage::Fetch)
        );
        assert!(h.mock.steps_for(&repos[2].path).contains(&GitStep::Pull));
    }

    #[test]
    fn test_branch_flow_uses_trimmed_name_on_selected_repos_only() {
        let mut h = Harness::new(&["alpha", "beta"]);
        h.act(Action::MoveSelection(1));
        h.act(Action::Confirm);
        h.act(Action::ToggleSelected);
        h.act(Action::Confirm);
        for c in " feat ".chars() {
            h.act(Action::InputChar(c));
        }
        h.act(Action::Confirm);

        assert_eq!(h.state.mode, Mode::Processing);
        assert_eq!(
            h.state
                .operation
                .as_ref()
                .and_then(Operation::new_branch),
            Some("feat")
        );

        h.wait_for_batch();
        let result = h.state.batch.as_ref().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries()[0].repo.name, "beta");
        assert!(result.is_all_success());
        assert!(
            h.mock
                .steps_for(&PathBuf::from("/tmp/alpha"))
                .is_empty()
        );
        assert_eq!(
            h.mock.steps_for(&PathBuf::from("/tmp/beta")).last(),
            Some(&GitStep::CreateBranch)
        );
    }

    #[test]
    fn test_quit_before_batch() {
        let mut h = Harness::new(&["alpha"]);
        assert_eq!(h.act(Action::Quit), Some(ExitAction::Quit));

        h.act(Action::Confirm);
        assert_eq!(h.act(Action::Quit), Some(ExitAction::Quit));
    }

    #[test]
    fn test_quit_from_results_returns_batch() {
        let mut h = Harness::new(&["alpha"]);
        h.act(Action::Confirm);
        h.act(Action::Confirm);
        h.wait_for_batch();

        // Confirm does nothing on the results screen
        assert!(h.act(Action::Confirm).is_none());
        match h.act(Action::Quit) {
            Some(ExitAction::Finished(result)) => assert!(result.is_all_success()),
            other => panic!("expected finished exit, got {other:?}"),
        }
    }

    #[test]
    fn test_keys_ignored_while_processing() {
        let repos = make_repos(&["alpha", "beta"]);
        let mock = MockGitProvider::default().delay_fetch(&repos[0].path, Duration::from_millis(200));
        let mut h = Harness::with_git(&["alpha", "beta"], mock);
        h.act(Action::Confirm);
        h.act(Action::Confirm);
        assert_eq!(h.state.mode, Mode::Processing);

        for key in [
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
        ] {
            assert_eq!(h.key(key), None);
            assert_eq!(h.state.mode, Mode::Processing);
        }

        // Every repo still runs its full sequence
        h.wait_for_batch();
        assert_eq!(h.state.mode, Mode::ShowResults);
        assert!(h.state.batch.as_ref().unwrap().is_all_success());
        for repo in &repos {
            assert!(h.mock.steps_for(&repo.path).contains(&GitStep::Pull));
        }
    }

    #[test]
    fn test_ctrl_c_quits_outside_processing() {
        let mut h = Harness::new(&["alpha"]);
        h.act(Action::Confirm);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(h.key(ctrl_c), Some(ExitAction::Quit));
    }

    #[test]
    fn test_draw_every_mode() {
        let theme = Theme::default();
        let start = Instant::now();
        let mut state = AppState::new(make_repos(&["alpha", "beta"]));
        state.error = Some(EMPTY_SELECTION_ERROR.to_string());

        for mode in [
            Mode::ChooseAction,
            Mode::ChooseRepositories,
            Mode::EnterBranchName,
            Mode::Processing,
            Mode::ShowResults,
        ] {
            state.mode = mode;
            let output =
                components::render_to_string(80, 12, |f| draw(f, &state, &theme, &start));
            assert!(
                output.contains("Error: No repositories selected"),
                "{mode:?}: {output}"
            );
        }
    }
}
