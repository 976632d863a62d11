//! Payload schema detection and prefix extraction.
//!
//! Range endpoints publish one of two known JSON shapes. Each shape has a
//! dedicated parser that either recognizes the document and extracts its
//! prefixes or answers "not this schema"; the parsers are tried in a fixed
//! order. An unrecognized document contributes nothing and is never an error.

use crate::prefix::PrefixSet;
use serde_json::Value;

/// Marker key identifying a regional edge list document
pub const REGIONAL_EDGE_MARKER: &str = "CLOUDFRONT_REGIONAL_EDGE_IP_LIST";

/// Service tag selecting CloudFront records in an ip-ranges document
pub const CLOUDFRONT_SERVICE: &str = "CLOUDFRONT";

/// Schema recognized in a fetched payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSchema {
    /// Document flagged with [`REGIONAL_EDGE_MARKER`]; every nested string
    /// leaf is a prefix
    RegionalEdge,
    /// Document with a top-level `prefixes` array of `{service, ip_prefix}`
    /// records
    IpRanges,
}

/// Extract the prefix set from a fetched payload.
///
/// Returns `None` when no known schema matches.
pub fn normalize(payload: &Value) -> Option<(PayloadSchema, PrefixSet)> {
    if let Some(prefixes) = regional_edge(payload) {
        return Some((PayloadSchema::RegionalEdge, prefixes));
    }
    if let Some(prefixes) = ip_ranges(payload) {
        return Some((PayloadSchema::IpRanges, prefixes));
    }
    None
}

/// Regional edge list: once the marker key is present the document is assumed
/// to contain only prefix values, so every string leaf anywhere in the nested
/// structure is collected.
fn regional_edge(payload: &Value) -> Option<PrefixSet> {
    payload.get(REGIONAL_EDGE_MARKER)?;

    let mut prefixes = PrefixSet::new();
    flatten_strings(payload, &mut prefixes);
    Some(prefixes)
}

fn flatten_strings(value: &Value, out: &mut PrefixSet) {
    match value {
        // insert drops empty tokens
        Value::String(leaf) => {
            out.insert(leaf.clone());
        }
        Value::Array(items) => {
            for item in items {
                flatten_strings(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                flatten_strings(item, out);
            }
        }
        _ => {}
    }
}

/// ip-ranges document: only records tagged with the CloudFront service
/// contribute, and only when they carry a non-empty `ip_prefix`.
fn ip_ranges(payload: &Value) -> Option<PrefixSet> {
    let records = payload.get("prefixes")?.as_array()?;

    let mut prefixes = PrefixSet::new();
    for record in records {
        if record.get("service").and_then(Value::as_str) != Some(CLOUDFRONT_SERVICE) {
            continue;
        }
        if let Some(prefix) = record.get("ip_prefix").and_then(Value::as_str) {
            prefixes.insert(prefix);
        }
    }
    Some(prefixes)
}
