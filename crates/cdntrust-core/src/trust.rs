//! Trust merger
//!
//! At host bootstrap the stored CDN ranges are unioned with the host's own
//! configured trusted proxies and the result is handed to the request-trust
//! registry. The union is rebuilt from the store on every process start, so
//! an update applied by the operator takes effect on the next boot without
//! any cache invalidation.

use crate::error::Result;
use crate::prefix::{AddressPrefix, PrefixSet};
use crate::traits::{RangeStore, TrustRegistry};
use std::sync::RwLock;

/// Union of the stored range set and the independently configured trusted
/// proxies, stored entries first, duplicates collapsed
pub async fn merged_trusted_proxies(
    store: &dyn RangeStore,
    configured: &[AddressPrefix],
) -> Result<PrefixSet> {
    let mut merged = store.load().await?;
    merged.extend(configured.iter().cloned());
    Ok(merged)
}

/// Derive the trusted-proxy union and register it
///
/// Must run before the host starts handling requests. Returns the number of
/// registered proxies.
pub async fn register_trusted_proxies(
    store: &dyn RangeStore,
    configured: &[AddressPrefix],
    registry: &dyn TrustRegistry,
) -> Result<usize> {
    let merged = merged_trusted_proxies(store, configured).await?;
    let count = merged.len();

    tracing::info!(proxies = count, "registering trusted proxies");
    registry.set_trusted_proxies(merged);

    Ok(count)
}

/// Process-wide trust registry
///
/// The in-process implementation of [`TrustRegistry`]: the host registers
/// once at bootstrap and request handlers query membership afterwards.
#[derive(Debug, Default)]
pub struct StaticTrustRegistry {
    trusted: RwLock<PrefixSet>,
}

impl StaticTrustRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-token membership test against the registered set
    pub fn is_trusted(&self, prefix: &str) -> bool {
        self.read().contains(prefix)
    }

    /// Copy of the registered set
    pub fn snapshot(&self) -> PrefixSet {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, PrefixSet> {
        self.trusted.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl TrustRegistry for StaticTrustRegistry {
    fn set_trusted_proxies(&self, proxies: PrefixSet) {
        let mut guard = self.trusted.write().unwrap_or_else(|e| e.into_inner());
        *guard = proxies;
    }
}
