//! In-memory implementation of the four strategy traits.
//!
//! Primarily for tests and simple consumers. Keys are derived from values by
//! an injected key function, so insert can return the key the value landed
//! under.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;
use keyfan_core::{DeleteError, InsertError, QueryError, QueryResult, UpdateError};

use crate::traits::{Deleter, Inserter, Queryer, Updater};

type KeyFn<K, V> = Box<dyn Fn(&V) -> K + Send + Sync>;

/// A map-backed backend implementing all four operation strategies.
///
/// All data is lost when the backend is dropped. Thread-safe via RwLock.
pub struct MemoryBackend<K, V> {
    entries: RwLock<HashMap<K, V>>,
    key_fn: KeyFn<K, V>,
}

impl<K, V> MemoryBackend<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty backend deriving keys from values with `key_fn`.
    pub fn new(key_fn: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            key_fn: Box::new(key_fn),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct lookup, bypassing the store choreography. For tests.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl<K, V> Inserter<K, V> for MemoryBackend<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn insert(&self, value: &V) -> Result<K, InsertError> {
        let key = (self.key_fn)(value);
        self.entries
            .write()
            .unwrap()
            .insert(key.clone(), value.clone());
        Ok(key)
    }
}

#[async_trait]
impl<K, V> Queryer<K, V> for MemoryBackend<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync + 'static,
{
    async fn query(&self, key: &K) -> Result<QueryResult<V>, QueryError> {
        let value = self.entries.read().unwrap().get(key).cloned();
        Ok(match value {
            Some(value) => QueryResult::new(std::iter::once(value)),
            None => QueryResult::empty(),
        })
    }
}

#[async_trait]
impl<K, V> Updater<K, V> for MemoryBackend<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn update(&self, key: &K, value: &V) -> Result<u64, UpdateError> {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(key) {
            Some(slot) => {
                *slot = value.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl<K, V> Deleter<K, V> for MemoryBackend<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn delete(&self, key: &K) -> Result<u64, DeleteError> {
        let removed = self.entries.write().unwrap().remove(key);
        Ok(if removed.is_some() { 1 } else { 0 })
    }
}
