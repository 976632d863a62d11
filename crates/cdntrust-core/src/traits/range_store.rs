// # Range Store Trait
//
// Defines the interface for durable storage of the accepted prefix set.
//
// ## Purpose
//
// The store carries the trusted range set between update runs and process
// restarts. The update engine reads it once at the start of a run and
// overwrites it at most once, after an accept decision; the trust merger
// reads it once at host bootstrap.
//
// ## Implementations
//
// - File-based: JSON document with atomic overwrite and backup recovery
// - Memory: for tests and embedding

use crate::error::Result;
use crate::prefix::PrefixSet;
use async_trait::async_trait;

/// Trait for range store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// `save` must be atomic: after a crash mid-save the store yields either
/// the previous set or the new one, never a torn document.
#[async_trait]
pub trait RangeStore: Send + Sync {
    /// Load the stored prefix set
    ///
    /// Returns the empty set when nothing has been stored yet.
    async fn load(&self) -> Result<PrefixSet>;

    /// Atomically overwrite the stored set with the full new set
    ///
    /// Callers always pass the complete set, never a delta.
    async fn save(&self, prefixes: &PrefixSet) -> Result<()>;
}
