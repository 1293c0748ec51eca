//! Single-assignment completion handles.
//!
//! An [`AsyncResult`] is created pending, alongside the [`Completer`] that is
//! the only way to assign its value. Exactly one of {completed, cancelled} is
//! reached, exactly once. Waiters share the completed value through an `Arc`;
//! cancellation wakes every waiter, which then observes cancellation instead
//! of a value.
//!
//! Cancellation is weak: it only changes what waiters observe. Work already
//! submitted on behalf of the handle runs to completion regardless.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Notify;

/// Why a waiter did not receive a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The handle was cancelled before completion.
    #[error("operation was cancelled")]
    Cancelled,
    /// The handle was still pending when the timeout expired. Only returned
    /// by [`AsyncResult::get_timeout`].
    #[error("timed out after {0:?} waiting for completion")]
    Timeout(Duration),
}

enum State<T> {
    Pending,
    Completed(Arc<T>),
    Cancelled,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

/// A blockable, cancelable handle to a future value.
///
/// Clone freely; all clones observe the same state.
pub struct AsyncResult<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for AsyncResult<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> AsyncResult<T> {
    /// Create a pending handle and the completer that settles it.
    pub fn pending() -> (Self, Completer<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending),
            notify: Notify::new(),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            Completer { shared },
        )
    }

    /// A handle that is already completed. Useful for trivial paths and tests.
    pub fn completed(value: T) -> Self {
        let (handle, completer) = Self::pending();
        completer.complete(value);
        handle
    }

    /// Wait until the handle is completed or cancelled.
    pub async fn get(&self) -> Result<Arc<T>, WaitError> {
        loop {
            // Register interest before checking state so a concurrent
            // notify_waiters cannot slip between the check and the await.
            let notified = self.shared.notify.notified();
            {
                let state = self.shared.state.lock().unwrap();
                match &*state {
                    State::Completed(value) => return Ok(Arc::clone(value)),
                    State::Cancelled => return Err(WaitError::Cancelled),
                    State::Pending => {}
                }
            }
            notified.await;
        }
    }

    /// Wait with a timeout. Errors with [`WaitError::Timeout`] if the handle
    /// is still pending when the duration elapses.
    pub async fn get_timeout(&self, timeout: Duration) -> Result<Arc<T>, WaitError> {
        match tokio::time::timeout(timeout, self.get()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(WaitError::Timeout(timeout)),
        }
    }

    /// The value, if already completed. Never blocks.
    pub fn try_get(&self) -> Option<Arc<T>> {
        match &*self.shared.state.lock().unwrap() {
            State::Completed(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Cancel a pending handle, waking all waiters. A no-op on a handle that
    /// is already completed or cancelled.
    pub fn cancel(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if matches!(*state, State::Pending) {
            *state = State::Cancelled;
            drop(state);
            self.shared.notify.notify_waiters();
        }
    }

    /// Whether the handle has reached completed or cancelled.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.shared.state.lock().unwrap(), State::Pending)
    }

    /// Whether the handle was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(*self.shared.state.lock().unwrap(), State::Cancelled)
    }
}

/// The assigning half of an [`AsyncResult`]. Consumed on completion, so the
/// value can be set at most once.
pub struct Completer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Completer<T> {
    /// Complete the handle. Returns false if it was cancelled first, in which
    /// case the value is dropped and waiters keep observing cancellation.
    pub fn complete(self, value: T) -> bool {
        let mut state = self.shared.state.lock().unwrap();
        if matches!(*state, State::Pending) {
            *state = State::Completed(Arc::new(value));
            drop(state);
            self.shared.notify.notify_waiters();
            true
        } else {
            false
        }
    }
}
