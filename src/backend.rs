use crate::app::{BackendEvent, BackendTask};
use crate::error::TreeError;
use crate::infra::DirectoryLister;
use crate::tree::render;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Runs rebuilds one at a time, in the order they were requested.
pub(crate) async fn worker_loop(
    lister: Arc<dyn DirectoryLister>,
    mut task_rx: UnboundedReceiver<BackendTask>,
    event_tx: UnboundedSender<BackendEvent>,
) {
    while let Some(task) = task_rx.recv().await {
        match task {
            BackendTask::Rebuild { session, hidden } => {
                let l = lister.clone();
                let started = Instant::now();
                let result =
                    tokio::task::spawn_blocking(move || render(l.as_ref(), &session, &hidden))
                        .await;
                let duration_ms = started.elapsed().as_millis() as u64;

                let event = match result {
                    Ok(Ok(snapshot)) => {
                        tracing::info!(
                            tree_lines = snapshot.tree.lines.len(),
                            directories = snapshot.directories.len(),
                            duration_ms,
                            "rebuild finished"
                        );
                        BackendEvent::Rebuilt {
                            snapshot,
                            duration_ms,
                        }
                    }
                    other => {
                        let message = flatten_error(other);
                        tracing::warn!(%message, "rebuild failed");
                        BackendEvent::Error {
                            context: "rebuild".to_string(),
                            message,
                        }
                    }
                };

                if event_tx.send(event).is_err() {
                    break;
                }
            }
        }
    }
}

fn flatten_error<T>(
    res: std::result::Result<Result<T, TreeError>, tokio::task::JoinError>,
) -> String {
    match res {
        Ok(Ok(_)) => "ok".to_string(),
        Ok(Err(err)) => err.to_string(),
        Err(err) => format!("join error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Session;
    use crate::exclusion::HiddenNames;
    use crate::infra::testing::MemoryLister;
    use std::path::PathBuf;
    use tokio::sync::mpsc;

    #[test]
    fn flatten_error_formats_all_cases() {
        let ok: std::result::Result<Result<(), TreeError>, tokio::task::JoinError> = Ok(Ok(()));
        assert_eq!(flatten_error(ok), "ok");

        let failed: std::result::Result<Result<(), TreeError>, tokio::task::JoinError> =
            Ok(Err(TreeError::Unreadable {
                path: PathBuf::from("/gone"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            }));
        assert_eq!(flatten_error(failed), "failed to list directory /gone: missing");
    }

    #[tokio::test]
    async fn worker_replies_in_request_order() {
        let lister: Arc<dyn DirectoryLister> = Arc::new(
            MemoryLister::new("/proj")
                .file("/proj/a.txt")
                .unreadable("/broken"),
        );
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(worker_loop(lister, task_rx, event_tx));

        for root in ["/proj", "/broken"] {
            task_tx
                .send(BackendTask::Rebuild {
                    session: Session::new(PathBuf::from(root)),
                    hidden: HiddenNames::default(),
                })
                .expect("send task");
        }
        drop(task_tx);

        match event_rx.recv().await.expect("first event") {
            BackendEvent::Rebuilt { snapshot, .. } => {
                assert_eq!(snapshot.tree.text(), " ┗ a.txt\n");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match event_rx.recv().await.expect("second event") {
            BackendEvent::Error { context, message } => {
                assert_eq!(context, "rebuild");
                assert!(message.contains("/broken"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        worker.await.expect("worker exits when senders drop");
    }
}
