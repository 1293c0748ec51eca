//! Synchronous in-place dispatch.

use std::sync::{Arc, RwLock};

use keyfan_core::Event;
use tracing::trace;

use crate::{EventDispatcher, Subscriber};

/// Delivers every event to every registered subscriber, synchronously, on
/// the task that called `dispatch`.
///
/// Registration order is delivery order. The subscriber list is snapshotted
/// per dispatch, so subscribers may register or unregister others from
/// within `on_event` without deadlocking; the change takes effect from the
/// next dispatch.
pub struct DirectDispatcher<K, V> {
    subscribers: RwLock<Vec<Arc<dyn Subscriber<K, V>>>>,
}

impl<K, V> DirectDispatcher<K, V> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for DirectDispatcher<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Send + Sync, V: Send + Sync> EventDispatcher<K, V> for DirectDispatcher<K, V> {
    fn dispatch(&self, event: Event<K, V>) {
        let snapshot = self.subscribers.read().unwrap().clone();
        trace!(kind = %event.kind(), subscribers = snapshot.len(), "direct dispatch");
        for subscriber in &snapshot {
            subscriber.on_event(&event);
        }
    }

    fn register(&self, subscriber: Arc<dyn Subscriber<K, V>>) {
        let mut subscribers = self.subscribers.write().unwrap();
        if !subscribers.iter().any(|s| Arc::ptr_eq(s, &subscriber)) {
            subscribers.push(subscriber);
        }
    }

    fn unregister(&self, subscriber: &Arc<dyn Subscriber<K, V>>) {
        self.subscribers
            .write()
            .unwrap()
            .retain(|s| !Arc::ptr_eq(s, subscriber));
    }
}
