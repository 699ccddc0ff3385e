use crate::{batch::BatchResult, git::Repo, switch::Operation};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Indices into the immutable repo list that are included in the batch.
/// Absence means not selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<usize>,
    len: usize,
}

impl SelectionSet {
    pub fn new(len: usize) -> Self {
        Self {
            selected: BTreeSet::new(),
            len,
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.len).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Flip one index. Out-of-range indices are ignored.
    pub fn toggle(&mut self, idx: usize) {
        if idx >= self.len {
            return;
        }
        if !self.selected.remove(&idx) {
            self.selected.insert(idx);
        }
    }

    /// Full selection becomes empty; anything else becomes full.
    pub fn toggle_all(&mut self) {
        if self.is_full() {
            self.clear();
        } else {
            self.select_all();
        }
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.selected.contains(&idx)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() == self.len
    }

    /// Selected indices, ascending
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}

/// Which operation the first screen picked. The branch name comes later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    SwitchToMain,
    SwitchToMainAndBranch,
}

impl ActionChoice {
    pub const ALL: [ActionChoice; 2] = [Self::SwitchToMain, Self::SwitchToMainAndBranch];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SwitchToMain => "Switch to main and pull latest",
            Self::SwitchToMainAndBranch => "Switch to main, pull latest, and create new branch",
        }
    }

    pub const fn needs_branch_name(self) -> bool {
        matches!(self, Self::SwitchToMainAndBranch)
    }
}

/// What screen the app is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ChooseAction,
    ChooseRepositories,
    EnterBranchName,
    /// Batch running in the background; no input except Ctrl+C
    Processing,
    ShowResults,
}

/// Central application state. Components read from this, actions modify it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub repos: Vec<Repo>,
    pub mode: Mode,
    pub cursor: usize,
    pub action: ActionChoice,
    pub selection: SelectionSet,
    pub branch_name: String,
    /// Shown once, cleared on the next key press
    pub error: Option<String>,
    /// The operation handed to the running or finished batch
    pub operation: Option<Operation>,
    pub batch: Option<BatchResult>,
}

impl AppState {
    pub fn new(repos: Vec<Repo>) -> Self {
        let selection = SelectionSet::new(repos.len());
        Self {
            repos,
            mode: Mode::ChooseAction,
            cursor: 0,
            action: ActionChoice::SwitchToMain,
            selection,
            branch_name: String::new(),
            error: None,
            operation: None,
            batch: None,
        }
    }

    /// Number of rows the cursor can move over on the current screen
    pub fn cursor_len(&self) -> usize {
        match self.mode {
            Mode::ChooseAction => ActionChoice::ALL.len(),
            Mode::ChooseRepositories => self.repos.len(),
            Mode::ShowResults => self.batch.as_ref().map_or(0, BatchResult::len),
            Mode::EnterBranchName | Mode::Processing => 0,
        }
    }

    /// Move the cursor by delta, clamping to bounds
    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.cursor_len();
        if len == 0 {
            return;
        }
        if delta > 0 {
            self.cursor = self
                .cursor
                .saturating_add(delta.unsigned_abs() as usize)
                .min(len - 1);
        } else {
            self.cursor = self.cursor.saturating_sub(delta.unsigned_abs() as usize);
        }
    }

    /// Repos in the selection, in list order
    pub fn selected_repos(&self) -> Vec<Repo> {
        self.selection
            .indices()
            .filter_map(|idx| self.repos.get(idx).cloned())
            .collect()
    }

    pub fn push_branch_char(&mut self, c: char) {
        self.branch_name.push(c);
    }

    /// Remove the last grapheme cluster. Returns false when already empty.
    pub fn pop_branch_grapheme(&mut self) -> bool {
        match self.branch_name.grapheme_indices(true).next_back() {
            Some((start, _)) => {
                self.branch_name.truncate(start);
                true
            }
            None => false,
        }
    }
}
