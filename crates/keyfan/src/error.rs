//! Aggregate-slot failure type for fan-out results.

use keyfan_core::{DeleteError, InsertError, OpKind, QueryError, UpdateError};
use thiserror::Error;

/// One slot of an aggregated fan-out result.
///
/// `Err` means that store's operation failed (or was dropped by its
/// execution context); `Ok` carries the store's result. This keeps
/// "operation legitimately returned nothing" distinguishable from
/// "operation failed", which a bare optional slot cannot express.
pub type Slot<T> = Result<T, OpFailure>;

/// A flattened record of one store's failure during fan-out.
///
/// Fan-out never rethrows a store's typed error to the orchestrator caller;
/// failed events (already dispatched by the store) are the rich failure
/// channel. The slot keeps the operation kind and rendered message so the
/// aggregate stays cloneable and shareable across waiters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{op} slot failed: {message}")]
pub struct OpFailure {
    /// Which operation kind failed.
    pub op: OpKind,
    /// The rendered error message, including the cause chain's head.
    pub message: String,
}

impl OpFailure {
    /// Slot failure for a task its execution context dropped before
    /// completion (e.g. the context shut down mid-chain).
    pub(crate) fn dropped(op: OpKind) -> Self {
        Self {
            op,
            message: "operation was dropped before completing".to_string(),
        }
    }
}

impl From<InsertError> for OpFailure {
    fn from(err: InsertError) -> Self {
        Self {
            op: OpKind::Insert,
            message: err.to_string(),
        }
    }
}

impl From<QueryError> for OpFailure {
    fn from(err: QueryError) -> Self {
        Self {
            op: OpKind::Query,
            message: err.to_string(),
        }
    }
}

impl From<UpdateError> for OpFailure {
    fn from(err: UpdateError) -> Self {
        Self {
            op: OpKind::Update,
            message: err.to_string(),
        }
    }
}

impl From<DeleteError> for OpFailure {
    fn from(err: DeleteError) -> Self {
        Self {
            op: OpKind::Delete,
            message: err.to_string(),
        }
    }
}
