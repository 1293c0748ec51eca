//! Event producers: pure mappings from operation data to optional events.
//!
//! A producer is attached to one operation kind, either persistently on a
//! store or scoped to a single call, and is consulted at each phase of that
//! operation. Returning `None` is the common case and means "no event for
//! this phase", not an error.
//!
//! Producers must be pure: no side effects, no awareness of the dispatcher
//! they feed. The store invokes them and forwards whatever they yield.

use crate::error::{DeleteError, InsertError, QueryError, UpdateError};
use crate::event::Event;

/// Producer hooks for insert calls.
pub trait InsertEvents<K, V>: Send + Sync {
    /// Called before the inserter strategy runs.
    fn start(&self, _value: &V) -> Option<Event<K, V>> {
        None
    }

    /// Called after the strategy returned the new key.
    fn end(&self, _key: &K, _value: &V) -> Option<Event<K, V>> {
        None
    }

    /// Called when the strategy raised an error. No end hook fires on this path.
    fn failed(&self, _value: &V, _error: &InsertError) -> Option<Event<K, V>> {
        None
    }
}

/// Producer hooks for query calls.
pub trait QueryEvents<K, V>: Send + Sync {
    fn start(&self, _key: &K) -> Option<Event<K, V>> {
        None
    }

    fn end(&self, _key: &K) -> Option<Event<K, V>> {
        None
    }

    fn failed(&self, _key: &K, _error: &QueryError) -> Option<Event<K, V>> {
        None
    }
}

/// Producer hooks for update calls.
pub trait UpdateEvents<K, V>: Send + Sync {
    fn start(&self, _key: &K, _value: &V) -> Option<Event<K, V>> {
        None
    }

    fn end(&self, _key: &K, _value: &V, _count: u64) -> Option<Event<K, V>> {
        None
    }

    fn failed(&self, _key: &K, _value: &V, _error: &UpdateError) -> Option<Event<K, V>> {
        None
    }
}

/// Producer hooks for delete calls.
pub trait DeleteEvents<K, V>: Send + Sync {
    fn start(&self, _key: &K) -> Option<Event<K, V>> {
        None
    }

    fn end(&self, _key: &K, _count: u64) -> Option<Event<K, V>> {
        None
    }

    fn failed(&self, _key: &K, _error: &DeleteError) -> Option<Event<K, V>> {
        None
    }
}

/// The standard producer: materializes every phase as its canonical event.
///
/// Attach one of these (per operation kind, or for all four) to get the full
/// lifecycle stream without writing custom producers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleProducer;

impl<K: Clone, V: Clone> InsertEvents<K, V> for LifecycleProducer {
    fn start(&self, value: &V) -> Option<Event<K, V>> {
        Some(Event::InsertStart {
            value: value.clone(),
        })
    }

    fn end(&self, key: &K, value: &V) -> Option<Event<K, V>> {
        Some(Event::InsertEnd {
            key: key.clone(),
            value: value.clone(),
        })
    }

    fn failed(&self, value: &V, error: &InsertError) -> Option<Event<K, V>> {
        Some(Event::InsertFailed {
            value: value.clone(),
            message: error.to_string(),
        })
    }
}

impl<K: Clone, V: Clone> QueryEvents<K, V> for LifecycleProducer {
    fn start(&self, key: &K) -> Option<Event<K, V>> {
        Some(Event::QueryStart { key: key.clone() })
    }

    fn end(&self, key: &K) -> Option<Event<K, V>> {
        Some(Event::QueryEnd { key: key.clone() })
    }

    fn failed(&self, key: &K, error: &QueryError) -> Option<Event<K, V>> {
        Some(Event::QueryFailed {
            key: key.clone(),
            message: error.to_string(),
        })
    }
}

impl<K: Clone, V: Clone> UpdateEvents<K, V> for LifecycleProducer {
    fn start(&self, key: &K, value: &V) -> Option<Event<K, V>> {
        Some(Event::UpdateStart {
            key: key.clone(),
            value: value.clone(),
        })
    }

    fn end(&self, key: &K, value: &V, count: u64) -> Option<Event<K, V>> {
        Some(Event::UpdateEnd {
            key: key.clone(),
            value: value.clone(),
            count,
        })
    }

    fn failed(&self, key: &K, value: &V, error: &UpdateError) -> Option<Event<K, V>> {
        Some(Event::UpdateFailed {
            key: key.clone(),
            value: value.clone(),
            message: error.to_string(),
        })
    }
}

impl<K: Clone, V: Clone> DeleteEvents<K, V> for LifecycleProducer {
    fn start(&self, key: &K) -> Option<Event<K, V>> {
        Some(Event::DeleteStart { key: key.clone() })
    }

    fn end(&self, key: &K, count: u64) -> Option<Event<K, V>> {
        Some(Event::DeleteEnd {
            key: key.clone(),
            count,
        })
    }

    fn failed(&self, key: &K, error: &DeleteError) -> Option<Event<K, V>> {
        Some(Event::DeleteFailed {
            key: key.clone(),
            message: error.to_string(),
        })
    }
}
