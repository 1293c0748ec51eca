//! Closeable, lazily-iterated query results.
//!
//! A [`QueryResult`] wraps a lazy sequence of values, typically backed by a
//! cursor-like resource in a concrete store. It is single-pass: values are
//! drained with [`QueryResult::next`] or [`QueryResult::collect_remaining`].
//! Closing drops the underlying iterator, runs an optional close hook, and is
//! idempotent. `is_closed` reports only explicit closure; exhausting the
//! sequence does not count.
//!
//! A caller that receives a new result superseding an earlier one is
//! responsible for closing the superseded one; this type does not track
//! supersession.

use std::fmt;
use std::sync::Mutex;

type Rows<V> = Box<dyn Iterator<Item = V> + Send>;
type CloseHook = Box<dyn FnOnce() + Send>;

/// A closeable, single-pass sequence of query values.
pub struct QueryResult<V> {
    inner: Mutex<Inner<V>>,
}

struct Inner<V> {
    rows: Option<Rows<V>>,
    on_close: Option<CloseHook>,
    closed: bool,
}

impl<V> QueryResult<V> {
    /// Wrap a lazy sequence of values.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = V>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                rows: Some(Box::new(rows.into_iter())),
                on_close: None,
                closed: false,
            }),
        }
    }

    /// An empty result.
    pub fn empty() -> Self
    where
        V: 'static,
    {
        Self::new(std::iter::empty())
    }

    /// Attach a hook that runs once when the result is closed (or dropped),
    /// e.g. to release a cursor.
    pub fn with_close_hook(self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.inner.lock().unwrap().on_close = Some(Box::new(hook));
        self
    }

    /// Pull the next value, or `None` when exhausted or closed.
    pub fn next(&self) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        inner.rows.as_mut().and_then(|rows| rows.next())
    }

    /// Drain all remaining values into a vector.
    pub fn collect_remaining(&self) -> Vec<V> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.as_mut() {
            Some(rows) => rows.collect(),
            None => Vec::new(),
        }
    }

    /// Close the result, releasing the underlying sequence. Safe to call
    /// multiple times.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.rows = None;
        if let Some(hook) = inner.on_close.take() {
            hook();
        }
    }

    /// Whether `close` has been called. Starts false; becomes permanently
    /// true only via an explicit close.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

impl<V> Drop for QueryResult<V> {
    fn drop(&mut self) {
        // Release the cursor even if the caller never closed explicitly.
        let inner = self.inner.get_mut().unwrap();
        inner.rows = None;
        if let Some(hook) = inner.on_close.take() {
            hook();
        }
    }
}

impl<V> fmt::Debug for QueryResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_drains_values_in_order() {
        let result = QueryResult::new(vec![1, 2, 3]);
        assert_eq!(result.next(), Some(1));
        assert_eq!(result.collect_remaining(), vec![2, 3]);
        assert_eq!(result.next(), None);
    }

    #[test]
    fn test_close_is_idempotent() {
        let result: QueryResult<u32> = QueryResult::new(vec![1]);
        assert!(!result.is_closed());
        result.close();
        assert!(result.is_closed());
        result.close();
        assert!(result.is_closed());
    }

    #[test]
    fn test_closed_result_yields_nothing() {
        let result = QueryResult::new(vec![1, 2]);
        result.close();
        assert_eq!(result.next(), None);
        assert!(result.collect_remaining().is_empty());
    }

    #[test]
    fn test_exhaustion_does_not_close() {
        let result = QueryResult::new(vec![1]);
        assert_eq!(result.next(), Some(1));
        assert_eq!(result.next(), None);
        assert!(!result.is_closed());
    }

    #[test]
    fn test_close_hook_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hook_calls = Arc::clone(&calls);
        let result = QueryResult::new(vec![1]).with_close_hook(move || {
            hook_calls.fetch_add(1, Ordering::SeqCst);
        });
        result.close();
        result.close();
        drop(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_runs_close_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hook_calls = Arc::clone(&calls);
        {
            let _result = QueryResult::new(vec![1]).with_close_hook(move || {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
