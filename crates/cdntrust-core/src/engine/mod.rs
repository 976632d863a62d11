//! Update engine for the trusted range set
//!
//! One run is a single linear pass with no retries and no resumable state:
//!
//! ```text
//! ┌───────────────┐     ┌─────────────┐     ┌────────────┐
//! │ EndpointConfig│ ──▶ │ RangeSource │ ──▶ │ normalize  │
//! └───────────────┘     └─────────────┘     └────────────┘
//!                                                  │ candidate set
//!                                                  ▼
//! ┌───────────────┐     ┌─────────────┐     ┌────────────┐
//! │  RangeStore   │ ◀── │  gate/force │ ◀── │ RangeDiff  │
//! └───────────────┘     └─────────────┘     └────────────┘
//! ```
//!
//! Per-endpoint failures (unreachable URL, undecodable body, unrecognized
//! schema) are reported and skipped; they never abort the run. The stored
//! set is overwritten at most once per run, and only after an accept
//! decision.

use crate::config::EndpointConfig;
use crate::diff::RangeDiff;
use crate::error::{Error, Result};
use crate::normalize;
use crate::prefix::PrefixSet;
use crate::traits::{RangeSource, RangeStore};
use tracing::{debug, info, warn};

/// Where an update run ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Changes were accepted and the candidate set was persisted
    Applied {
        /// The applied change
        diff: RangeDiff,
        /// Size of the persisted set
        total: usize,
    },

    /// Candidate and stored set already agree; the set was re-saved as-is
    Unchanged {
        /// Size of the persisted set
        total: usize,
    },

    /// Nothing usable was fetched; the stored set was left untouched.
    /// This outcome stands even in force mode.
    NoRangesFound,

    /// The operator declined the change; the stored set was left untouched
    Declined {
        /// The declined change
        diff: RangeDiff,
    },
}

impl UpdateOutcome {
    /// True when the run persisted the candidate set
    pub fn accepted(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::Applied { .. } | UpdateOutcome::Unchanged { .. }
        )
    }
}

/// Options for a single update run
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Accept a non-empty diff without consulting the gate
    pub force: bool,
}

/// Decides whether a reviewed change is applied
///
/// Consulted only when there is a real diff and force mode is off. The
/// engine never asks twice in one run. Implementations should default to
/// declining on any ambiguity.
pub trait UpdateGate: Send + Sync {
    /// Ask whether the presented change should be applied
    fn confirm(&self, diff: &RangeDiff, total: usize) -> Result<bool>;
}

/// Operator-facing progress and change reporting
///
/// Reporting is presentation only: a silenced reporter never changes what
/// the engine decides. Default method bodies do nothing so implementations
/// pick the events they care about.
pub trait UpdateReporter: Send + Sync {
    /// An endpoint fetch is starting
    fn downloading(&self, _url: &str) {}

    /// An endpoint could not be fetched or decoded; it is being skipped
    fn fetch_failed(&self, _url: &str, _error: &Error) {}

    /// A payload matched no known schema; it is being skipped
    fn unrecognized_payload(&self, _url: &str) {}

    /// The run produced a real diff, about to be decided on
    fn changes(&self, _diff: &RangeDiff, _total: usize) {}

    /// Candidate and stored set already agree
    fn no_changes(&self) {}

    /// Nothing usable was fetched
    fn no_ranges_found(&self) {}
}

/// Reconciles the stored trusted range set against the configured endpoints
pub struct UpdateEngine {
    /// Fetches raw documents, one URL at a time
    source: Box<dyn RangeSource>,

    /// Durable home of the accepted set
    store: Box<dyn RangeStore>,

    /// Operator-facing reporting
    reporter: Box<dyn UpdateReporter>,

    /// Confirmation seam for non-forced runs
    gate: Box<dyn UpdateGate>,

    /// Endpoints to query, in order
    endpoints: EndpointConfig,
}

impl UpdateEngine {
    /// Create a new update engine
    pub fn new(
        source: Box<dyn RangeSource>,
        store: Box<dyn RangeStore>,
        reporter: Box<dyn UpdateReporter>,
        gate: Box<dyn UpdateGate>,
        endpoints: EndpointConfig,
    ) -> Self {
        Self {
            source,
            store,
            reporter,
            gate,
            endpoints,
        }
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateOutcome)`: how the run was decided
    /// - `Err(Error)`: loading or saving the store failed, or the gate
    ///   could not collect an answer
    pub async fn run(&self, opts: UpdateOptions) -> Result<UpdateOutcome> {
        let previous = self.store.load().await?;
        let candidate = self.fetch_candidate().await;

        if candidate.is_empty() {
            // An empty fetch result must never wipe out a known-good set,
            // not even under force.
            warn!("no ranges found at any endpoint");
            self.reporter.no_ranges_found();
            return Ok(UpdateOutcome::NoRangesFound);
        }

        let diff = RangeDiff::between(&candidate, &previous);
        let total = candidate.len();

        if diff.is_unchanged() {
            debug!(total, "candidate matches the stored set");
            self.reporter.no_changes();
            self.store.save(&candidate).await?;
            return Ok(UpdateOutcome::Unchanged { total });
        }

        self.reporter.changes(&diff, total);

        let accepted = opts.force || self.gate.confirm(&diff, total)?;
        if !accepted {
            info!("operator declined the update");
            return Ok(UpdateOutcome::Declined { diff });
        }

        self.store.save(&candidate).await?;
        info!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            total,
            "trusted range set updated"
        );
        Ok(UpdateOutcome::Applied { diff, total })
    }

    /// Fetch every resolved endpoint in order and union the recognized
    /// payloads into the candidate set
    async fn fetch_candidate(&self) -> PrefixSet {
        let mut candidate = PrefixSet::new();

        for url in self.endpoints.resolve() {
            self.reporter.downloading(&url);

            let payload = match self.source.fetch(&url).await {
                Ok(payload) => payload,
                Err(error) => {
                    warn!(%url, %error, "skipping endpoint");
                    self.reporter.fetch_failed(&url, &error);
                    continue;
                }
            };

            match normalize::normalize(&payload) {
                Some((schema, prefixes)) => {
                    debug!(%url, ?schema, count = prefixes.len(), "payload recognized");
                    candidate.extend(prefixes);
                }
                None => {
                    warn!(%url, "payload matches no known schema, skipping");
                    self.reporter.unrecognized_payload(&url);
                }
            }
        }

        candidate
    }
}
