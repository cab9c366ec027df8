use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{FutureExt, TryFutureExt};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::TaskSpawner;

#[derive(Debug)]
#[must_use = "TaskHandle does nothing unless polled"]
pub struct TaskHandle<T>(JoinHandle<TaskResult<T>>);

impl<T> TaskHandle<T> {
    pub(crate) fn new(inner: JoinHandle<TaskResult<T>>) -> Self {
        Self(inner)
    }

    /// Aborts the task associated with this handle.
    pub fn abort(&self) {
        self.0.abort();
    }

    /// Returns `true` if the task has finished executing.
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = TaskResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = unsafe { self.map_unchecked_mut(|s| &mut s.0) };
        match inner.poll(cx) {
            Poll::Ready(Ok(res)) => Poll::Ready(res),
            Poll::Ready(Err(err)) => std::panic::resume_unwind(err.into_panic()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// A task result that can be either completed or cancelled.
#[derive(Debug, Copy, Clone)]
pub enum TaskResult<T> {
    /// The task completed successfully with the given result.
    Completed(T),
    /// The task was cancelled.
    Cancelled,
}

impl<T> TaskResult<T> {
    /// Returns true if the task was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskResult::Cancelled)
    }
}

#[derive(Debug)]
pub struct CriticalTask;

/// A builder for building tasks to be spawned on the associated [`TaskSpawner`].
///
/// Can only be created using [`TaskSpawner::build_task`].
#[derive(Debug)]
pub struct TaskBuilder<'a, T = ()> {
    spawner: &'a TaskSpawner,
    name: Option<String>,
    /// Notifies the spawner to perform a graceful shutdown when this task finishes, whether by
    /// completion or cancellation.
    graceful_shutdown: bool,

    _phantom: PhantomData<T>,
}

impl<'a> TaskBuilder<'a> {
    pub(crate) fn new(spawner: &'a TaskSpawner) -> Self {
        Self { spawner, name: None, graceful_shutdown: false, _phantom: PhantomData }
    }

    /// Notifies the task spawner to perform a graceful shutdown when this task finishes.
    pub fn graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = true;
        self
    }

    pub fn critical(self) -> TaskBuilder<'a, CriticalTask> {
        TaskBuilder {
            name: self.name,
            spawner: self.spawner,
            graceful_shutdown: true,
            _phantom: PhantomData,
        }
    }

    /// Spawns the given future based on the configured builder.
    pub fn spawn<F>(self, fut: F) -> TaskHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.spawner.spawn_on_manager(self.build_future(fut))
    }
}

impl<'a, T> TaskBuilder<'a, T> {
    /// Sets the name of the task, used in shutdown log lines.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    fn build_future<F>(&self, fut: F) -> impl Future<Output = F::Output>
    where
        F: Future + Send + 'static,
    {
        let graceful_shutdown = self.graceful_shutdown;
        let cancellation_token = self.spawner.cancellation_token().clone();
        let task_name = self.name.clone().unwrap_or_else(|| "unnamed".to_string());

        fut.map(move |res| {
            if graceful_shutdown {
                debug!(target: "tasks", task = task_name, "task with graceful shutdown completed");
                cancellation_token.cancel();
            }
            res
        })
    }
}

impl<'a> TaskBuilder<'a, CriticalTask> {
    /// Spawns a task whose panic cancels every other task spawned through the same
    /// [`TaskSpawner`] (e.g. a transport's read loop, a stream watcher's poll loop).
    pub fn spawn<F>(self, fut: F) -> TaskHandle<()>
    where
        F: Future + Send + 'static,
    {
        let cancellation_token = self.spawner.cancellation_token().clone();
        let task_name = self.name.clone().unwrap_or_else(|| "unnamed".to_string());

        let fut = AssertUnwindSafe(fut)
            .catch_unwind()
            .map_err(move |error| {
                let error = PanickedTaskError { error };
                error!(%error, task = task_name, "critical task failed");
                cancellation_token.cancel();
                error
            })
            .map(|res: Result<F::Output, PanickedTaskError>| {
                let _ = res;
            });

        self.spawner.spawn_on_manager(self.build_future(fut))
    }
}

/// A simple wrapper type so that we can implement [`std::error::Error`] for `Box<dyn Any + Send>`.
#[derive(Debug, Error)]
pub struct PanickedTaskError {
    error: Box<dyn Any + Send>,
}

impl std::fmt::Display for PanickedTaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.error.downcast_ref::<String>() {
            None => Ok(()),
            Some(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn spawned_task_runs_to_completion() {
        let spawner = TaskSpawner::new();
        let handle = spawner.spawn(async { 1 + 1 });
        assert!(matches!(handle.await, TaskResult::Completed(2)));
    }

    #[tokio::test]
    async fn shutdown_cancels_graceful_tasks() {
        let spawner = TaskSpawner::new();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let handle = spawner.build_task().graceful_shutdown().spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            ran_clone.store(true, Ordering::SeqCst);
        });

        spawner.shutdown();
        assert!(handle.await.is_cancelled());
        assert!(!ran.load(Ordering::SeqCst));
    }
}
