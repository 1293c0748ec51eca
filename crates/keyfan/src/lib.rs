//! # keyfan
//!
//! An instrumented key-value operation layer: stores whose every operation
//! emits lifecycle events through pluggable dispatchers, and an orchestrator
//! that fans logical operations out across named groups of stores
//! ("segments") with deterministic, registration-order aggregation.
//!
//! ## Overview
//!
//! - **Store**: insert/query/update/delete behind strategy seams, each call
//!   wrapped in start/end/failed event choreography
//! - **Events**: a {kind} × {phase} union routed to subscribers by fieldless
//!   [`EventKind`] keys, through direct, scheduled, publish/subscribe, or
//!   composite dispatchers
//! - **Orchestrator**: registers stores under segments, runs each store's
//!   operation on its own execution context, and returns a non-blocking
//!   [`AsyncResult`] whose slots line up with registration order
//!
//! Failure of one store never halts the rest of a fan-out; its slot records
//! the failure and its failed event has already been dispatched. Callers
//! wanting failure detail subscribe to failed events.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use keyfan::{Orchestrator, OrchestratorConfig, Store, DEFAULT_SEGMENT};
//!
//! #[tokio::main]
//! async fn main() {
//!     let orchestrator = Orchestrator::new(OrchestratorConfig::default());
//!     let store = Arc::new(Store::in_memory(|v: &String| v.clone()));
//!     orchestrator.add_store(DEFAULT_SEGMENT, store);
//!
//!     let result = orchestrator.insert(DEFAULT_SEGMENT, "value".to_string(), Vec::new());
//!     let slots = result.get().await.unwrap();
//!     assert_eq!(slots.len(), 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! The component crates are re-exported for convenience:
//!
//! - `keyfan::core` - events, producers, errors, handles, contexts
//! - `keyfan::dispatch` - dispatcher variants and the subscriber trait
//! - `keyfan::store` - the instrumented store and strategy traits

pub mod error;
pub mod orchestrator;

// Re-export component crates
pub use keyfan_core as core;
pub use keyfan_dispatch as dispatch;
pub use keyfan_store as store;

// Re-export main types for convenience
pub use error::{OpFailure, Slot};
pub use orchestrator::{Orchestrator, OrchestratorConfig, DEFAULT_SEGMENT};

// Re-export commonly used component types
pub use keyfan_core::{
    AsyncResult, DeleteError, DeleteEvents, Event, EventKind, ExecutionContext, InsertError,
    InsertEvents, LifecycleProducer, OpKind, Phase, QueryError, QueryEvents, QueryResult,
    SerialContext, TokioContext, UpdateError, UpdateEvents, WaitError,
};
pub use keyfan_dispatch::{
    CompositeDispatcher, DirectDispatcher, EventDispatcher, NoopDispatcher, PubSubDispatcher,
    ScheduledDispatcher, Subscriber,
};
pub use keyfan_store::{Deleter, Inserter, MemoryBackend, Queryer, Store, Updater};
