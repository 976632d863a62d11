//! Configuration types for the trusted-range system
//!
//! This module defines the configuration structures consumed by the update
//! engine and the trust merger.

use crate::prefix::AddressPrefix;
use serde::{Deserialize, Serialize};

/// Canonical published document listing address ranges for every service.
/// Used as the fallback endpoint when no tools endpoints are configured.
pub const IP_RANGES_URL: &str = "https://ip-ranges.amazonaws.com/ip-ranges.json";

/// Where the update flow looks for range documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Ordered tools endpoints, preferred over the fallback when non-empty
    #[serde(rename = "cloudfront-tools", default)]
    pub cloudfront_tools: Vec<String>,

    /// Single fallback URL used when no tools endpoints are configured
    #[serde(default = "default_fallback")]
    pub fallback: Option<String>,
}

impl EndpointConfig {
    /// Resolve into the ordered URL sequence to query.
    ///
    /// Empty only when neither a tools list nor a fallback is configured;
    /// the update run then performs zero fetches and is rejected as
    /// "no IPs found".
    pub fn resolve(&self) -> Vec<String> {
        if !self.cloudfront_tools.is_empty() {
            return self.cloudfront_tools.clone();
        }
        self.fallback.iter().cloned().collect()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            cloudfront_tools: Vec::new(),
            fallback: default_fallback(),
        }
    }
}

fn default_fallback() -> Option<String> {
    Some(IP_RANGES_URL.to_string())
}

/// Range store selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// File-backed store
    File {
        /// Path to the range file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,
}

/// Full configuration for the trusted-range system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Endpoints the update flow queries
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Independently trusted proxies, merged with the stored set at bootstrap
    #[serde(default)]
    pub trusted_proxies: Vec<AddressPrefix>,

    /// Where the accepted range set lives
    #[serde(default)]
    pub store: StoreConfig,
}

impl TrustConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for url in self
            .endpoints
            .cloudfront_tools
            .iter()
            .chain(self.endpoints.fallback.iter())
        {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "endpoint URL must use http or https: {url}"
                )));
            }
        }

        if let StoreConfig::File { path } = &self.store
            && path.is_empty()
        {
            return Err(crate::Error::config("store path cannot be empty"));
        }

        Ok(())
    }
}
