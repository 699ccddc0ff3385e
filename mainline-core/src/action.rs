/// Every user interaction produces an Action. UI never directly calls git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,

    // Movement
    MoveSelection(i32),

    // Screen flow
    Confirm,
    GoBack,

    // Repository selection
    ToggleSelected,
    ToggleAll,

    // Branch name input
    InputChar(char),
    DeleteChar,
}
