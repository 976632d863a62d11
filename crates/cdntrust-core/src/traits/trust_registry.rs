// # Trust Registry Trait
//
// Seam to the host's request-trust mechanism.
//
// Whatever is registered here is the set of upstream addresses allowed to
// set forwarded-client-IP headers that the host honors when resolving the
// real client address. The host must register before it starts handling
// requests; afterwards the registered set is treated as immutable for the
// life of the process.

use crate::prefix::PrefixSet;

/// Trait for request-trust registries
pub trait TrustRegistry: Send + Sync {
    /// Register the trusted proxy set, replacing any previously registered
    /// set
    fn set_trusted_proxies(&self, proxies: PrefixSet);
}
