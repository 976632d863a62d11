//! Test doubles and common utilities for the contract tests
//!
//! All doubles are cheap to clone and share their interior state, so a test
//! can keep one handle while the engine owns another.

use cdntrust_core::config::EndpointConfig;
use cdntrust_core::diff::RangeDiff;
use cdntrust_core::engine::{UpdateGate, UpdateReporter};
use cdntrust_core::error::{Error, Result};
use cdntrust_core::prefix::PrefixSet;
use cdntrust_core::state::MemoryRangeStore;
use cdntrust_core::traits::{RangeSource, RangeStore};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A range source serving canned payloads per URL; unknown URLs fail
#[derive(Clone)]
pub struct ScriptedRangeSource {
    payloads: Arc<HashMap<String, Value>>,
    fetch_count: Arc<AtomicUsize>,
}

impl ScriptedRangeSource {
    pub fn new(payloads: Vec<(&str, Value)>) -> Self {
        Self {
            payloads: Arc::new(
                payloads
                    .into_iter()
                    .map(|(url, payload)| (url.to_string(), payload))
                    .collect(),
            ),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times fetch() was called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RangeSource for ScriptedRangeSource {
    async fn fetch(&self, url: &str) -> Result<Value> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(format!("unreachable endpoint {url}")))
    }
}

/// Events captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Downloading(String),
    FetchFailed(String),
    Unrecognized(String),
    Changes {
        added: Vec<String>,
        removed: Vec<String>,
        total: usize,
    },
    NoChanges,
    NoRangesFound,
}

/// A reporter that records every event it sees
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl UpdateReporter for RecordingReporter {
    fn downloading(&self, url: &str) {
        self.record(ReportEvent::Downloading(url.to_string()));
    }

    fn fetch_failed(&self, url: &str, _error: &Error) {
        self.record(ReportEvent::FetchFailed(url.to_string()));
    }

    fn unrecognized_payload(&self, url: &str) {
        self.record(ReportEvent::Unrecognized(url.to_string()));
    }

    fn changes(&self, diff: &RangeDiff, total: usize) {
        self.record(ReportEvent::Changes {
            added: diff.added.iter().cloned().collect(),
            removed: diff.removed.iter().cloned().collect(),
            total,
        });
    }

    fn no_changes(&self) {
        self.record(ReportEvent::NoChanges);
    }

    fn no_ranges_found(&self) {
        self.record(ReportEvent::NoRangesFound);
    }
}

/// A gate with a fixed answer that counts how often it was consulted
#[derive(Clone)]
pub struct ScriptedGate {
    answer: bool,
    confirm_count: Arc<AtomicUsize>,
}

impl ScriptedGate {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            confirm_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times confirm() was called
    pub fn confirm_count(&self) -> usize {
        self.confirm_count.load(Ordering::SeqCst)
    }
}

impl UpdateGate for ScriptedGate {
    fn confirm(&self, _diff: &RangeDiff, _total: usize) -> Result<bool> {
        self.confirm_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// A store wrapper that counts loads and saves
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemoryRangeStore,
    load_count: Arc<AtomicUsize>,
    save_count: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(prefixes: PrefixSet) -> Self {
        Self {
            inner: MemoryRangeStore::seeded(prefixes),
            load_count: Arc::new(AtomicUsize::new(0)),
            save_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Current stored set, bypassing the counters
    pub async fn stored(&self) -> PrefixSet {
        self.inner.load().await.unwrap()
    }
}

#[async_trait::async_trait]
impl RangeStore for CountingStore {
    async fn load(&self) -> Result<PrefixSet> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        self.inner.load().await
    }

    async fn save(&self, prefixes: &PrefixSet) -> Result<()> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.inner.save(prefixes).await
    }
}

/// A store whose save always fails
#[derive(Clone, Default)]
pub struct FailingSaveStore;

#[async_trait::async_trait]
impl RangeStore for FailingSaveStore {
    async fn load(&self) -> Result<PrefixSet> {
        Ok(PrefixSet::new())
    }

    async fn save(&self, _prefixes: &PrefixSet) -> Result<()> {
        Err(Error::store("disk full"))
    }
}

/// Endpoint configuration pointing at exactly `urls`, no fallback
pub fn endpoints(urls: &[&str]) -> EndpointConfig {
    EndpointConfig {
        cloudfront_tools: urls.iter().map(|url| url.to_string()).collect(),
        fallback: None,
    }
}

/// An ip-ranges document whose CloudFront records carry `prefixes`
pub fn cloudfront_payload(prefixes: &[&str]) -> Value {
    let records: Vec<Value> = prefixes
        .iter()
        .map(|prefix| json!({ "service": "CLOUDFRONT", "ip_prefix": prefix }))
        .collect();
    json!({ "syncToken": "1758293621", "prefixes": records })
}
