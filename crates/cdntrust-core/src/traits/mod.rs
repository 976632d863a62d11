//! Core traits for the trusted-range system
//!
//! This module defines the seams between the update engine, the outside
//! world and the host application.
//!
//! - [`RangeSource`]: retrieve raw range documents from an endpoint
//! - [`RangeStore`]: durable storage for the accepted prefix set
//! - [`TrustRegistry`]: request-trust mechanism the merged set is handed to

pub mod range_source;
pub mod range_store;
pub mod trust_registry;

pub use range_source::RangeSource;
pub use range_store::RangeStore;
pub use trust_registry::TrustRegistry;
