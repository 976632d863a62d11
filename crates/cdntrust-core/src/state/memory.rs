// # Memory Range Store
//
// In-memory implementation of RangeStore.
//
// All state is lost on restart. Useful for tests and for embedding
// scenarios where the host supplies the range set itself.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::prefix::PrefixSet;
use crate::traits::RangeStore;

/// In-memory range store
///
/// Cloning yields a handle onto the same underlying set, so a test can keep
/// one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRangeStore {
    inner: Arc<RwLock<PrefixSet>>,
}

impl MemoryRangeStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `prefixes`
    pub fn seeded(prefixes: PrefixSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(prefixes)),
        }
    }

    /// Number of stored prefixes
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl RangeStore for MemoryRangeStore {
    async fn load(&self) -> Result<PrefixSet> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, prefixes: &PrefixSet) -> Result<()> {
        *self.inner.write().await = prefixes.clone();
        Ok(())
    }
}
