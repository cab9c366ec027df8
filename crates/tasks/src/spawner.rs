use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::{TaskBuilder, TaskHandle};

#[derive(Debug)]
struct Inner {
    handle: Handle,
    cancellation_token: CancellationToken,
}

/// Spawns background tasks for a transport or stream worker, all tied to a single
/// cancellation token.
///
/// Dropping every clone of the token's owner (or calling [`TaskSpawner::shutdown`]) cancels
/// every task spawned through it that opted into graceful shutdown.
#[derive(Debug, Clone)]
pub struct TaskSpawner {
    inner: Arc<Inner>,
}

impl TaskSpawner {
    /// Creates a spawner bound to the current Tokio runtime.
    pub fn new() -> Self {
        Self::new_with_handle(Handle::current())
    }

    pub fn new_with_handle(handle: Handle) -> Self {
        Self { inner: Arc::new(Inner { handle, cancellation_token: CancellationToken::new() }) }
    }

    pub(crate) fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.cancellation_token
    }

    /// Signals cancellation to every task spawned with [`TaskBuilder::graceful_shutdown`].
    pub fn shutdown(&self) {
        self.inner.cancellation_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.cancellation_token.is_cancelled()
    }

    /// Returns a new [`TaskBuilder`] for building a task.
    pub fn build_task(&self) -> TaskBuilder<'_> {
        TaskBuilder::new(self)
    }

    pub fn spawn<F>(&self, fut: F) -> TaskHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.build_task().spawn(fut)
    }

    pub(crate) fn spawn_on_manager<F>(&self, fut: F) -> TaskHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let cancellation_token = self.inner.cancellation_token.clone();
        let handle = self.inner.handle.spawn(async move {
            tokio::select! {
                biased;
                () = cancellation_token.cancelled() => crate::TaskResult::Cancelled,
                res = fut => crate::TaskResult::Completed(res),
            }
        });
        TaskHandle::new(handle)
    }
}

impl Default for TaskSpawner {
    fn default() -> Self {
        Self::new()
    }
}
