//! Background search task
//!
//! Runs one request on the tokio runtime and hands the outcome back to the
//! UI loop through a oneshot channel. The UI thread never blocks on it: it
//! polls [`SearchTask::poll`] on every tick.

use super::client::JackettClient;
use super::error::{Result, SearchError};
use super::model::{ResultSet, SearchQuery};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;

/// Handle to an in-flight search
///
/// Dropping the handle cancels the request.
#[derive(Debug)]
pub struct SearchTask {
    receiver: oneshot::Receiver<Result<ResultSet>>,
    cancel: CancellationToken,
    finished: bool,
}

impl SearchTask {
    /// Spawn a search on the given runtime
    #[must_use]
    pub fn spawn(runtime: &Handle, client: JackettClient, query: SearchQuery) -> Self {
        Self::spawn_future(runtime, async move { client.search(&query).await })
    }

    /// Spawn any search-shaped future with the same cancellation and
    /// reporting behaviour
    #[must_use]
    pub fn spawn_future<F>(runtime: &Handle, search: F) -> Self
    where
        F: Future<Output = Result<ResultSet>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        runtime.spawn(async move {
            let outcome = tokio::select! {
                () = token.cancelled() => {
                    tracing::info!("search cancelled");
                    Err(SearchError::Cancelled)
                }
                outcome = search => outcome,
            };
            // The receiver is gone if the screen was dropped; nothing to report.
            let _ = sender.send(outcome);
        });

        Self {
            receiver,
            cancel,
            finished: false,
        }
    }

    /// Check for a completed search without blocking
    ///
    /// Returns the outcome exactly once; later calls return `None`.
    pub fn poll(&mut self) -> Option<Result<ResultSet>> {
        if self.finished {
            return None;
        }

        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(SearchError::TaskAborted),
        };
        self.finished = true;
        Some(outcome)
    }

    /// Cancel the request if it is still running
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the outcome has already been taken
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn wait(task: &mut SearchTask) -> Result<ResultSet> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = task.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "search task never reported back");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_outcome_is_delivered_once() {
        let rt = runtime();
        let mut task = SearchTask::spawn_future(rt.handle(), async {
            Ok::<_, SearchError>(ResultSet::default())
        });

        assert!(wait(&mut task).unwrap().is_empty());
        assert!(task.is_finished());
        assert!(task.poll().is_none());
    }

    #[test]
    fn test_cancel_reports_cancelled() {
        let rt = runtime();
        let pending = std::future::pending::<Result<ResultSet>>();
        let mut task = SearchTask::spawn_future(rt.handle(), pending);
        assert!(task.poll().is_none());

        task.cancel();
        assert!(matches!(wait(&mut task), Err(SearchError::Cancelled)));
    }

    #[test]
    fn test_panicked_task_is_reported_as_aborted() {
        let rt = runtime();
        let mut task = SearchTask::spawn_future(rt.handle(), async {
            if ResultSet::default().is_empty() {
                panic!("boom");
            }
            Ok::<_, SearchError>(ResultSet::default())
        });
        assert!(matches!(wait(&mut task), Err(SearchError::TaskAborted)));
    }
}
