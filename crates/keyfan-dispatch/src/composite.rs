//! Fan-out to multiple dispatchers.

use std::sync::Arc;

use keyfan_core::Event;

use crate::{EventDispatcher, Subscriber};

/// Forwards every `dispatch`, `register`, and `unregister` to each child
/// dispatcher, in construction order.
///
/// Lets a store feed several sinks at once, e.g. a direct in-process sink
/// plus a scheduled one marshalling to another context.
pub struct CompositeDispatcher<K, V> {
    children: Vec<Arc<dyn EventDispatcher<K, V>>>,
}

impl<K, V> CompositeDispatcher<K, V> {
    pub fn new(children: Vec<Arc<dyn EventDispatcher<K, V>>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<K, V> EventDispatcher<K, V> for CompositeDispatcher<K, V>
where
    K: Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn dispatch(&self, event: Event<K, V>) {
        for child in &self.children {
            child.dispatch(event.clone());
        }
    }

    fn register(&self, subscriber: Arc<dyn Subscriber<K, V>>) {
        for child in &self.children {
            child.register(Arc::clone(&subscriber));
        }
    }

    fn unregister(&self, subscriber: &Arc<dyn Subscriber<K, V>>) {
        for child in &self.children {
            child.unregister(subscriber);
        }
    }
}
