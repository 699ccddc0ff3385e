use mainline_core::{
    batch::{BatchOptions, BatchResult, run_batch},
    event::AppEvent,
    git::{GitProvider, Repo},
    switch::Operation,
};
use std::{io, sync::Arc, thread};

use super::EventSender;

/// Run the batch off the UI thread and report back with one event. If the
/// thread can't be started, every repo is reported as a launch failure.
pub(super) fn spawn_batch(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    repos: Vec<Repo>,
    op: Operation,
    options: BatchOptions,
) {
    let git = Arc::clone(git);
    let worker_sender = sender.clone();
    let submitted = repos.clone();
    let spawned = thread::Builder::new()
        .name("mainline-batch".to_string())
        .spawn(move || {
            let result = run_batch(git.as_ref(), &repos, &op, &options);
            worker_sender.send(AppEvent::BatchCompleted(result));
        });

    if let Err(e) = spawned {
        report_spawn_failure(sender, &submitted, &e);
    }
}

fn report_spawn_failure(sender: &EventSender, repos: &[Repo], error: &io::Error) {
    log::error!("Failed to start batch thread: {error}");
    let message = format!("failed to start batch: {error}");
    sender.send(AppEvent::BatchCompleted(BatchResult::launch_failed(
        repos, &message,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use mainline_core::switch::{Outcome, Stage};
    use std::{path::PathBuf, sync::mpsc};

    #[test]
    fn test_spawn_failure_reports_launch_for_every_repo() {
        let (tx, rx) = mpsc::channel();
        let sender = EventSender { tx };
        let repos = vec![Repo {
            name: "alpha".to_string(),
            path: PathBuf::from("/tmp/alpha"),
        }];

        report_spawn_failure(&sender, &repos, &io::Error::other("out of threads"));

        let AppEvent::BatchCompleted(result) = rx.try_recv().unwrap();
        assert_eq!(result.len(), 1);
        match &result.entries()[0].outcome {
            Outcome::Failure { stage, message } => {
                assert_eq!(*stage, Stage::Launch);
                assert!(message.contains("out of threads"), "{message}");
            }
            Outcome::Success => panic!("expected a launch failure"),
        }
    }
}
