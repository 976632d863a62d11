//! Minimal embedding example for cdntrust-core
//!
//! Shows a host application registering the merged trusted-proxy set at
//! bootstrap, before any request handling starts. The stored CDN ranges are
//! combined with the host's own trusted proxies; the union is rebuilt on
//! every start, so an update applied with `cdntrustctl update` takes effect
//! on the next boot.

use anyhow::Result;
use cdntrust_core::trust::{StaticTrustRegistry, register_trusted_proxies};
use cdntrust_core::{MemoryRangeStore, TrustConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    // Host configuration: its own trusted proxies, independent of the CDN set
    let config = TrustConfig {
        trusted_proxies: vec!["10.0.0.1/32".to_string()],
        ..TrustConfig::default()
    };

    // Stand-in for the durable store an operator keeps current with
    // `cdntrustctl update`; a real host would open a FileRangeStore at the
    // same path the CLI writes to
    let store = MemoryRangeStore::seeded(["13.32.0.0/15", "13.35.0.0/16"].into_iter().collect());

    // Bootstrap: register the union before serving traffic
    let registry = StaticTrustRegistry::new();
    let count = register_trusted_proxies(&store, &config.trusted_proxies, &registry).await?;
    println!("trusting {count} proxy ranges");

    // Request handlers honor forwarded-client-IP headers only from
    // registered sources
    assert!(registry.is_trusted("13.32.0.0/15"));
    assert!(registry.is_trusted("10.0.0.1/32"));
    assert!(!registry.is_trusted("192.0.2.1/32"));

    Ok(())
}
