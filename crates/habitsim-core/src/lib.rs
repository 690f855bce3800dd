//! Habit Consequence Simulator — core inference pipeline.
//!
//! Given a free-text habit or activity description, the
//! [`Orchestrator`](orchestrator::Orchestrator) produces a validated
//! structured result by trying credentials and model identifiers in priority
//! order until one succeeds, with bounded backoff on rate limits and a
//! normalized error taxonomy on total failure.
//!
//! # Architecture
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`credentials`] | Env-sourced credential pool, filtered and priority-ordered |
//! | [`provider`] | [`InferenceProvider`](provider::InferenceProvider) seam over the remote backend |
//! | [`gemini`] | Gemini Generative Language API client (reqwest) |
//! | [`extract`] | JSON extraction from semi-structured model output |
//! | [`schema`] | Structured result shapes, prompt contracts, failure payloads |
//! | [`orchestrator`] | The credential × model fallback search |
//! | [`observer`] | Attempt/final-outcome event hooks |
//! | [`error`] | Attempt errors and the terminal failure taxonomy |
//! | [`history`] | Narrow per-user analysis-history interface |

pub mod credentials;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod history;
pub mod observer;
pub mod orchestrator;
pub mod provider;
pub mod schema;

pub use credentials::{Credential, CredentialPool};
pub use error::{ClassifiedFailure, FailureKind, InferenceError, InferenceResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use history::{AnalysisRecord, HistoryStore, InMemoryHistoryStore};
pub use observer::{Attempt, AttemptObserver, AttemptOutcome, FinalOutcome, TracingObserver};
pub use orchestrator::{Orchestrator, OrchestratorError, MODEL_PRIORITY, RATE_LIMIT_BACKOFF};
pub use provider::InferenceProvider;
pub use schema::{AnalysisSchema, HabitReplacement, RiskAssessment, RiskLevel};
