//! # keyfan-dispatch
//!
//! Fire-and-forget event sinks for the keyfan operation layer.
//!
//! A store hands every produced [`Event`] to its active
//! [`EventDispatcher`]; the dispatcher decides who hears about it and where.
//! Five variants cover the design space:
//!
//! - [`NoopDispatcher`]: drops everything (the store default)
//! - [`DirectDispatcher`]: synchronous delivery to every registered
//!   subscriber, on the calling task
//! - [`ScheduledDispatcher`]: wraps another dispatcher and marshals every
//!   call onto an [`ExecutionContext`](keyfan_core::ExecutionContext)
//! - [`PubSubDispatcher`]: routes by [`EventKind`] through a per-kind
//!   subscription table
//! - [`CompositeDispatcher`]: fans every call out to N child dispatchers
//!
//! Dispatch never reports subscriber outcomes back to the emitting store.

use std::sync::Arc;

use keyfan_core::{Event, EventKind};

mod composite;
mod direct;
mod pubsub;
mod scheduled;

pub use composite::CompositeDispatcher;
pub use direct::DirectDispatcher;
pub use pubsub::PubSubDispatcher;
pub use scheduled::ScheduledDispatcher;

/// A receiver of dispatched events.
///
/// Subscriber identity is `Arc` pointer identity: `unregister` removes the
/// exact `Arc` that was registered.
pub trait Subscriber<K, V>: Send + Sync {
    /// The event kinds this subscriber wants. Kind-routing dispatchers
    /// ([`PubSubDispatcher`]) deliver only these; [`DirectDispatcher`]
    /// delivers everything regardless. Defaults to all sixteen kinds.
    fn kinds(&self) -> Vec<EventKind> {
        EventKind::all().to_vec()
    }

    /// Handle one event. Must not block the dispatching task for long;
    /// subscribers needing to move work elsewhere should hand it off
    /// themselves.
    fn on_event(&self, event: &Event<K, V>);
}

/// A fire-and-forget event sink with subscriber management.
pub trait EventDispatcher<K, V>: Send + Sync {
    /// Deliver one event. Never blocks on or inspects subscriber outcomes.
    fn dispatch(&self, event: Event<K, V>);

    /// Attach a subscriber.
    fn register(&self, subscriber: Arc<dyn Subscriber<K, V>>);

    /// Detach a previously registered subscriber. Unknown subscribers are
    /// ignored.
    fn unregister(&self, subscriber: &Arc<dyn Subscriber<K, V>>);
}

/// Drops every event; registrations are accepted and forgotten.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl NoopDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<K, V> EventDispatcher<K, V> for NoopDispatcher {
    fn dispatch(&self, _event: Event<K, V>) {}

    fn register(&self, _subscriber: Arc<dyn Subscriber<K, V>>) {}

    fn unregister(&self, _subscriber: &Arc<dyn Subscriber<K, V>>) {}
}
