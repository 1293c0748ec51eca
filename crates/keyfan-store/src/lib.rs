//! # keyfan-store
//!
//! The instrumented store of the keyfan operation layer.
//!
//! A [`Store`] owns one strategy per operation kind (the
//! [`Inserter`]/[`Queryer`]/[`Updater`]/[`Deleter`] seams), persistent event
//! producers per kind, and a swappable dispatcher. Every operation is wrapped
//! in start/end/failed event choreography; the strategy's typed error always
//! propagates to the direct caller after the failed events fire.
//!
//! [`MemoryBackend`] is the bundled map-backed backend, mainly for tests and
//! simple consumers; real backends implement the strategy traits against
//! their own storage.

pub mod memory;
pub mod store;
pub mod traits;

pub use memory::MemoryBackend;
pub use store::{Store, StoreBuilder};
pub use traits::{Deleter, Inserter, Queryer, Updater};

use std::hash::Hash;
use std::sync::Arc;

impl<K, V> Store<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// A store backed by an in-memory map, deriving keys from values with
    /// `key_fn`. Dispatcher defaults to no-op.
    pub fn in_memory(key_fn: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        Store::builder()
            .backend(Arc::new(MemoryBackend::new(key_fn)))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = Store::in_memory(|value: &(u32, &'static str)| value.0);
        let key = store.insert((3, "three"), &[]).await.unwrap();
        assert_eq!(key, 3);
        let result = store.query(3, &[]).await.unwrap();
        assert_eq!(result.collect_remaining(), vec![(3, "three")]);
    }
}
