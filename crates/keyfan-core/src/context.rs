//! Execution contexts: where submitted tasks run.
//!
//! The core never spawns onto an ambient global; every component that needs
//! to run work somewhere takes an explicit `Arc<dyn ExecutionContext>` at
//! construction time. Two implementations cover the common cases:
//!
//! - [`TokioContext`]: spawns each task onto a tokio runtime, tasks run
//!   concurrently.
//! - [`SerialContext`]: a single worker draining a queue, tasks run one at a
//!   time in submission order.

use std::future::Future;
use std::pin::Pin;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::warn;

/// A boxed unit of work.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// An abstraction over "where a task runs".
pub trait ExecutionContext: Send + Sync {
    /// Submit a task for execution. Fire-and-forget: the submitter gets no
    /// handle and no completion signal beyond what the task itself arranges.
    fn submit(&self, task: Task);
}

/// Convenience extension for submitting unboxed futures.
pub trait ExecutionContextExt {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl<C: ExecutionContext + ?Sized> ExecutionContextExt for C {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.submit(Box::pin(future));
    }
}

/// Runs tasks on a tokio runtime; tasks are independent and may interleave.
#[derive(Debug, Clone)]
pub struct TokioContext {
    handle: Handle,
}

impl TokioContext {
    /// Bind to an explicit runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime of the calling task.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, same as
    /// [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl ExecutionContext for TokioContext {
    fn submit(&self, task: Task) {
        self.handle.spawn(task);
    }
}

/// A single-worker context: tasks run to completion one at a time, in
/// submission order.
#[derive(Debug, Clone)]
pub struct SerialContext {
    queue: mpsc::UnboundedSender<Task>,
}

impl SerialContext {
    /// Start a worker on the calling task's runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::on(&Handle::current())
    }

    /// Start a worker on the given runtime.
    pub fn on(handle: &Handle) -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<Task>();
        handle.spawn(async move {
            while let Some(task) = rx.recv().await {
                task.await;
            }
        });
        Self { queue }
    }
}

impl Default for SerialContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for SerialContext {
    fn submit(&self, task: Task) {
        if self.queue.send(task).is_err() {
            // Worker is gone (runtime shut down); nothing left to run on.
            warn!("serial context worker stopped; task dropped");
        }
    }
}
