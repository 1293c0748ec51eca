//! # keyfan-testkit
//!
//! Testing utilities for the keyfan operation layer.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Recorders**: dispatchers, subscribers, and producer probes that
//!   capture what a store emitted and in what order
//! - **Strategies**: scripted backends (failing, slow) for failure-isolation
//!   and ordering tests
//! - **Generators**: proptest strategies for event kinds, segment names, and
//!   delay schedules
//!
//! ## Recording a store's event stream
//!
//! ```rust
//! use std::sync::Arc;
//! use keyfan::{EventDispatcher, LifecycleProducer, Store};
//! use keyfan_testkit::recorders::RecordingDispatcher;
//!
//! # #[tokio::main] async fn main() {
//! let store = Store::in_memory(|v: &String| v.clone());
//! let recorder = RecordingDispatcher::new();
//! store.set_dispatcher(Some(
//!     recorder.clone() as Arc<dyn EventDispatcher<String, String>>,
//! ));
//! store.add_insert_producer(Arc::new(LifecycleProducer));
//!
//! store.insert("value".to_string(), &[]).await.unwrap();
//! assert_eq!(recorder.kinds().len(), 2); // start, end
//! # }
//! ```

pub mod generators;
pub mod recorders;
pub mod strategies;

pub use generators::{delay_schedule, event_kind, op_kind, phase, segment_name};
pub use recorders::{CollectingSubscriber, ProbeProducer, RecordingDispatcher};
pub use strategies::{FailingBackend, SlowInserter};
