use mainline_core::{
    batch::BatchOptions,
    git::GitProvider,
    state::{ActionChoice, AppState, Mode},
    switch::Operation,
};
use std::sync::Arc;

use super::EventSender;
use super::spawn::spawn_batch;

pub(super) const EMPTY_SELECTION_ERROR: &str = "No repositories selected";
pub(super) const EMPTY_BRANCH_NAME_ERROR: &str = "Branch name cannot be empty";

pub(super) fn handle_confirm(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    options: &BatchOptions,
) {
    match state.mode {
        Mode::ChooseAction => {
            state.action = ActionChoice::ALL
                .get(state.cursor)
                .copied()
                .unwrap_or(ActionChoice::SwitchToMain);
            state.selection.select_all();
            state.cursor = 0;
            state.mode = Mode::ChooseRepositories;
        }
        Mode::ChooseRepositories => {
            if state.selection.is_empty() {
                state.error = Some(EMPTY_SELECTION_ERROR.to_string());
            } else if state.action.needs_branch_name() {
                state.branch_name.clear();
                state.mode = Mode::EnterBranchName;
            } else {
                start_batch(state, Operation::SwitchToMain, git, sender, options);
            }
        }
        Mode::EnterBranchName => match Operation::switch_and_branch(&state.branch_name) {
            Some(op) => start_batch(state, op, git, sender, options),
            None => state.error = Some(EMPTY_BRANCH_NAME_ERROR.to_string()),
        },
        Mode::Processing | Mode::ShowResults => {}
    }
}

fn start_batch(
    state: &mut AppState,
    op: Operation,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    options: &BatchOptions,
) {
    let repos = state.selected_repos();
    log::info!("Confirmed '{op}' for {} repos", repos.len());
    state.operation = Some(op.clone());
    state.cursor = 0;
    state.mode = Mode::Processing;
    spawn_batch(git, sender, repos, op, options.clone());
}

pub(super) fn handle_go_back(state: &mut AppState) {
    match state.mode {
        Mode::ChooseRepositories => {
            state.selection.clear();
            state.cursor = 0;
            state.mode = Mode::ChooseAction;
        }
        Mode::EnterBranchName => {
            state.cursor = 0;
            state.mode = Mode::ChooseRepositories;
        }
        Mode::ChooseAction | Mode::Processing | Mode::ShowResults => {}
    }
}

pub(super) fn handle_toggle_selected(state: &mut AppState) {
    if state.mode == Mode::ChooseRepositories {
        state.selection.toggle(state.cursor);
    }
}

pub(super) fn handle_toggle_all(state: &mut AppState) {
    if state.mode == Mode::ChooseRepositories {
        state.selection.toggle_all();
    }
}

pub(super) fn handle_input_char(state: &mut AppState, c: char) {
    if state.mode == Mode::EnterBranchName && !c.is_control() {
        state.push_branch_char(c);
    }
}

pub(super) fn handle_delete_char(state: &mut AppState) {
    if state.mode == Mode::EnterBranchName {
        state.pop_branch_grapheme();
    }
}
