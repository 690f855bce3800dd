//! Attempt observer — logging as an injected extension point.
//!
//! The orchestrator emits events at three points (attempt start, attempt
//! result, final outcome) instead of logging inline, so tests can assert on
//! what happened without capturing process output. [`TracingObserver`] is
//! the production implementation.

use crate::error::{ClassifiedFailure, FailureKind, InferenceError};
use tracing::{debug, info, warn};

/// Identity of one attempt. Never carries the full credential.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// 1-based priority rank of the credential in use.
    pub key_rank: usize,
    /// Masked credential suffix, e.g. `...wxyz`.
    pub key_suffix: String,
    /// Model identifier being tried.
    pub model: String,
}

/// How one attempt ended.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// Parsed output accepted; the search stops here.
    Accepted,
    /// Attempt failed; the search continues.
    Rejected {
        kind: FailureKind,
        detail: String,
    },
}

impl AttemptOutcome {
    pub(crate) fn rejected(err: &InferenceError) -> Self {
        Self::Rejected {
            kind: ClassifiedFailure::from_last_error(Some(err)).kind,
            detail: err.to_string(),
        }
    }
}

/// Terminal result of one orchestrator invocation.
#[derive(Debug, Clone)]
pub enum FinalOutcome {
    Success {
        attempts: usize,
    },
    Failure {
        attempts: usize,
        failure: ClassifiedFailure,
    },
}

/// Receives orchestrator events. All hooks default to no-ops.
pub trait AttemptObserver: Send + Sync {
    fn on_attempt_start(&self, _attempt: &Attempt) {}
    fn on_attempt_result(&self, _attempt: &Attempt, _outcome: &AttemptOutcome) {}
    fn on_final_outcome(&self, _outcome: &FinalOutcome) {}
}

/// No-op observer.
#[derive(Debug, Default)]
pub struct NullObserver;

impl AttemptObserver for NullObserver {}

/// Observer that emits structured `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: &Attempt) {
        debug!(
            key_rank = attempt.key_rank,
            key_suffix = %attempt.key_suffix,
            model = %attempt.model,
            "trying model"
        );
    }

    fn on_attempt_result(&self, attempt: &Attempt, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Accepted => info!(
                key_rank = attempt.key_rank,
                model = %attempt.model,
                "inference succeeded"
            ),
            AttemptOutcome::Rejected { kind, detail } => warn!(
                key_rank = attempt.key_rank,
                model = %attempt.model,
                kind = ?kind,
                detail = %detail,
                "attempt failed"
            ),
        }
    }

    fn on_final_outcome(&self, outcome: &FinalOutcome) {
        match outcome {
            FinalOutcome::Success { attempts } => {
                info!(attempts, "analysis complete");
            }
            FinalOutcome::Failure { attempts, failure } => warn!(
                attempts,
                kind = ?failure.kind,
                message = %failure.message,
                "all attempts exhausted"
            ),
        }
    }
}
