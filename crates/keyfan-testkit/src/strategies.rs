//! Scripted strategy implementations for exercising stores under delay and
//! failure.

use std::time::Duration;

use async_trait::async_trait;
use keyfan_core::{DeleteError, InsertError, QueryError, QueryResult, UpdateError};
use keyfan_store::{Deleter, Inserter, Queryer, Updater};

/// A backend whose every operation fails with a scripted message.
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl<K: Send + Sync, V: Send + Sync> Inserter<K, V> for FailingBackend {
    async fn insert(&self, _value: &V) -> Result<K, InsertError> {
        Err(InsertError::new(self.message.clone()))
    }
}

#[async_trait]
impl<K: Send + Sync, V: Send + Sync> Queryer<K, V> for FailingBackend {
    async fn query(&self, _key: &K) -> Result<QueryResult<V>, QueryError> {
        Err(QueryError::new(self.message.clone()))
    }
}

#[async_trait]
impl<K: Send + Sync, V: Send + Sync> Updater<K, V> for FailingBackend {
    async fn update(&self, _key: &K, _value: &V) -> Result<u64, UpdateError> {
        Err(UpdateError::new(self.message.clone()))
    }
}

#[async_trait]
impl<K: Send + Sync, V: Send + Sync> Deleter<K, V> for FailingBackend {
    async fn delete(&self, _key: &K) -> Result<u64, DeleteError> {
        Err(DeleteError::new(self.message.clone()))
    }
}

/// An inserter that sleeps before returning a fixed key. For ordering and
/// non-blocking tests where completion time must differ from submission
/// order.
pub struct SlowInserter<K> {
    key: K,
    delay: Duration,
}

impl<K> SlowInserter<K> {
    pub fn new(key: K, delay: Duration) -> Self {
        Self { key, delay }
    }
}

#[async_trait]
impl<K, V> Inserter<K, V> for SlowInserter<K>
where
    K: Clone + Send + Sync,
    V: Send + Sync,
{
    async fn insert(&self, _value: &V) -> Result<K, InsertError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.key.clone())
    }
}
