//! Handle for a scheduled dashboard redirect.

use tokio::task::{AbortHandle, JoinHandle};

/// A pending "conversation complete" redirect.
///
/// Dropping the handle does not cancel the redirect.
#[derive(Debug)]
pub struct RedirectHandle {
    task: JoinHandle<()>,
}

impl RedirectHandle {
    pub(super) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub(super) fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }

    /// Stop the redirect if it has not navigated yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the redirect has either navigated or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the redirect to end.
    ///
    /// Returns `true` if navigation happened, `false` if it was cancelled.
    pub async fn finished(self) -> bool {
        self.task.await.is_ok()
    }
}
