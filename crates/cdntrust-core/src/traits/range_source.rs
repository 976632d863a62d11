// # Range Source Trait
//
// Defines the interface for retrieving published range documents.
//
// ## Implementations
//
// - HTTP: `cdntrust-ranges-http` crate
// - Test doubles: scripted sources in the contract tests

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for range document sources
///
/// One fetch retrieves and parses the JSON document published at a single
/// URL. Implementations own the transport policy (in particular, request
/// timeouts live here); the update engine owns skip-and-continue handling,
/// so implementations simply return whatever error they hit.
///
/// Implementations must not retry: a failed endpoint is reported to the
/// operator and skipped, and the run carries on with the remaining
/// endpoints.
#[async_trait]
pub trait RangeSource: Send + Sync {
    /// Fetch and parse the document published at `url`
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: the decoded JSON document
    /// - `Err(Error)`: the endpoint was unreachable, answered with an
    ///   error status, or its body was not valid JSON
    async fn fetch(&self, url: &str) -> Result<Value>;
}
