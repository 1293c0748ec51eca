//! Strategy traits: the extension seam for concrete store backends.
//!
//! A backend implements one trait per operation it supports and is installed
//! into the matching slot of a [`Store`](crate::Store). Each strategy raises
//! its operation's typed error on failure; the store wraps every call with
//! start/end/failed event emission and otherwise stays out of the way.
//!
//! All methods are async so both in-memory and I/O-bound backends fit behind
//! the same seam.

use async_trait::async_trait;
use keyfan_core::{DeleteError, InsertError, QueryError, QueryResult, UpdateError};

/// Stores a value, returning the key it was stored under.
#[async_trait]
pub trait Inserter<K, V>: Send + Sync {
    async fn insert(&self, value: &V) -> Result<K, InsertError>;
}

/// Produces the values matching a key as a lazy, closeable sequence.
#[async_trait]
pub trait Queryer<K, V>: Send + Sync {
    async fn query(&self, key: &K) -> Result<QueryResult<V>, QueryError>;
}

/// Replaces the value(s) stored under a key.
///
/// Returns the number of stored items affected by this call: 0 or 1 for a
/// single-key backend, more if the backend treats the key as a predicate.
#[async_trait]
pub trait Updater<K, V>: Send + Sync {
    async fn update(&self, key: &K, value: &V) -> Result<u64, UpdateError>;
}

/// Removes the value(s) stored under a key, returning the affected count.
#[async_trait]
pub trait Deleter<K, V>: Send + Sync {
    async fn delete(&self, key: &K) -> Result<u64, DeleteError>;
}
