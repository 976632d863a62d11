//! Range store implementations
//!
//! - [`FileRangeStore`]: durable JSON document with atomic overwrite and
//!   backup recovery
//! - [`MemoryRangeStore`]: in-memory store for tests and embedding

pub mod file;
pub mod memory;

pub use file::FileRangeStore;
pub use memory::MemoryRangeStore;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::traits::RangeStore;

/// Build a range store from configuration
pub async fn build_store(config: &StoreConfig) -> Result<Box<dyn RangeStore>> {
    match config {
        StoreConfig::File { path } => Ok(Box::new(FileRangeStore::new(path).await?)),
        StoreConfig::Memory => Ok(Box::new(MemoryRangeStore::new())),
    }
}
