use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mainline_core::action::Action;
use mainline_core::state::{AppState, Mode};

/// Resolve a key event into an Action based on current mode
pub fn resolve_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    // The batch can't be interrupted
    if state.mode == Mode::Processing {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match state.mode {
        Mode::ChooseAction => resolve_action_key(key.code),
        Mode::ChooseRepositories => resolve_repo_key(key.code),
        Mode::EnterBranchName => resolve_branch_name_key(key),
        Mode::ShowResults => resolve_results_key(key.code),
        Mode::Processing => None,
    }
}

fn resolve_movement(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveSelection(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveSelection(1)),
        _ => None,
    }
}

fn resolve_action_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        other => resolve_movement(other),
    }
}

fn resolve_repo_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char(' ') => Some(Action::ToggleSelected),
        KeyCode::Char('a') => Some(Action::ToggleAll),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::GoBack),
        KeyCode::Char('q') => Some(Action::Quit),
        other => resolve_movement(other),
    }
}

fn resolve_branch_name_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::GoBack),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            None
        }
        KeyCode::Char(c) if !c.is_control() => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn resolve_results_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::Quit),
        other => resolve_movement(other),
    }
}
