use crate::batch::BatchResult;

/// Events that arrive asynchronously from background tasks.
/// These get merged into the main event loop alongside keyboard input.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Every repository in the batch has produced an outcome
    BatchCompleted(BatchResult),
}
