//! # keyfan-core
//!
//! Core primitives for the keyfan operation layer:
//!
//! - **Events**: the {insert, query, update, delete} × {start, progress, end,
//!   failed} lifecycle union, with fieldless [`EventKind`] routing keys
//! - **Producers**: pure per-operation hooks mapping call data to optional
//!   events
//! - **Errors**: one typed error per operation kind, message plus optional
//!   cause
//! - **QueryResult**: closeable, single-pass value sequences
//! - **AsyncResult**: single-assignment, blockable, cancelable completion
//!   handles
//! - **ExecutionContext**: explicit "where does this run" injection, with
//!   tokio-backed and single-worker implementations
//!
//! Higher layers build on these: `keyfan-dispatch` for event fan-out,
//! `keyfan-store` for instrumented stores, and `keyfan` for segment
//! orchestration.

pub mod context;
pub mod error;
pub mod event;
pub mod handle;
pub mod producer;
pub mod query;

pub use context::{ExecutionContext, ExecutionContextExt, SerialContext, Task, TokioContext};
pub use error::{Cause, DeleteError, InsertError, QueryError, UpdateError};
pub use event::{Event, EventKind, OpKind, Phase};
pub use handle::{AsyncResult, Completer, WaitError};
pub use producer::{DeleteEvents, InsertEvents, LifecycleProducer, QueryEvents, UpdateEvents};
pub use query::QueryResult;
