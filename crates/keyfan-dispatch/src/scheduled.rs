//! Context-marshalled dispatch.

use std::sync::Arc;

use keyfan_core::{Event, ExecutionContext, ExecutionContextExt};

use crate::{EventDispatcher, Subscriber};

/// Wraps another dispatcher and submits every `dispatch`, `register`, and
/// `unregister` as a task on an [`ExecutionContext`].
///
/// The typical use is marshalling events off the operation's context and
/// onto a designated one (a UI-owning worker, a logging thread). With a
/// [`SerialContext`](keyfan_core::SerialContext) the relative order of calls
/// is preserved; with a concurrent context it is not.
pub struct ScheduledDispatcher<K, V> {
    inner: Arc<dyn EventDispatcher<K, V>>,
    context: Arc<dyn ExecutionContext>,
}

impl<K, V> ScheduledDispatcher<K, V> {
    pub fn new(inner: Arc<dyn EventDispatcher<K, V>>, context: Arc<dyn ExecutionContext>) -> Self {
        Self { inner, context }
    }
}

impl<K, V> EventDispatcher<K, V> for ScheduledDispatcher<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn dispatch(&self, event: Event<K, V>) {
        let inner = Arc::clone(&self.inner);
        self.context.spawn(async move {
            inner.dispatch(event);
        });
    }

    fn register(&self, subscriber: Arc<dyn Subscriber<K, V>>) {
        let inner = Arc::clone(&self.inner);
        self.context.spawn(async move {
            inner.register(subscriber);
        });
    }

    fn unregister(&self, subscriber: &Arc<dyn Subscriber<K, V>>) {
        let inner = Arc::clone(&self.inner);
        let subscriber = Arc::clone(subscriber);
        self.context.spawn(async move {
            inner.unregister(&subscriber);
        });
    }
}
