//! Contract test: empty candidate sets never overwrite a good set
//!
//! An empty fetch result (no endpoints, all endpoints down, or nothing
//! recognized) must reject the run and leave the stored set untouched,
//! regardless of force mode.

mod common;

use cdntrust_core::UpdateEngine;
use cdntrust_core::engine::{UpdateOptions, UpdateOutcome};
use cdntrust_core::prefix::PrefixSet;
use common::*;
use serde_json::json;

fn engine(
    source: &ScriptedRangeSource,
    store: &CountingStore,
    reporter: &RecordingReporter,
    gate: &ScriptedGate,
    urls: &[&str],
) -> UpdateEngine {
    UpdateEngine::new(
        Box::new(source.clone()),
        Box::new(store.clone()),
        Box::new(reporter.clone()),
        Box::new(gate.clone()),
        endpoints(urls),
    )
}

#[tokio::test]
async fn no_configured_endpoints_rejects_without_fetching() {
    let previous: PrefixSet = ["13.32.0.0/15"].into_iter().collect();
    let source = ScriptedRangeSource::new(vec![]);
    let store = CountingStore::seeded(previous.clone());
    let reporter = RecordingReporter::new();
    let gate = ScriptedGate::new(true);

    let outcome = engine(&source, &store, &reporter, &gate, &[])
        .run(UpdateOptions { force: true })
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NoRangesFound);
    assert!(!outcome.accepted());
    assert_eq!(source.fetch_count(), 0);
    assert_eq!(store.save_count(), 0);
    assert_eq!(store.stored().await, previous);
    assert!(reporter.events().contains(&ReportEvent::NoRangesFound));
}

#[tokio::test]
async fn all_endpoints_failing_rejects_even_under_force() {
    let previous: PrefixSet = ["13.32.0.0/15"].into_iter().collect();
    let source = ScriptedRangeSource::new(vec![]);
    let store = CountingStore::seeded(previous.clone());
    let reporter = RecordingReporter::new();
    let gate = ScriptedGate::new(true);

    let outcome = engine(
        &source,
        &store,
        &reporter,
        &gate,
        &["https://down-a.example/ips", "https://down-b.example/ips"],
    )
    .run(UpdateOptions { force: true })
    .await
    .unwrap();

    assert_eq!(outcome, UpdateOutcome::NoRangesFound);
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(store.save_count(), 0, "the stored set must survive a dead fetch");
    assert_eq!(store.stored().await, previous);
}

#[tokio::test]
async fn unrecognized_payloads_alone_reject_the_run() {
    let source = ScriptedRangeSource::new(vec![(
        "https://odd.example/ips",
        json!({ "unexpected": ["13.32.0.0/15"] }),
    )]);
    let store = CountingStore::seeded(["13.32.0.0/15"].into_iter().collect());
    let reporter = RecordingReporter::new();
    let gate = ScriptedGate::new(true);

    let outcome = engine(&source, &store, &reporter, &gate, &["https://odd.example/ips"])
        .run(UpdateOptions { force: true })
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NoRangesFound);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn empty_candidate_never_consults_the_gate() {
    let source = ScriptedRangeSource::new(vec![]);
    let store = CountingStore::seeded(["13.32.0.0/15"].into_iter().collect());
    let reporter = RecordingReporter::new();
    let gate = ScriptedGate::new(true);

    engine(&source, &store, &reporter, &gate, &["https://down.example/ips"])
        .run(UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(gate.confirm_count(), 0);
}
