//! Inference request orchestrator.
//!
//! Priority-ordered exhaustive search over credentials × models with
//! short-circuit on the first accepted parse:
//!
//! ```text
//! for credential in pool (priority order):
//!     for model in models (stability order):
//!         generate → extract text → slice JSON → parse → check marker
//!         truthy marker: return parsed result        (stops both loops)
//!         rate-limit error: sleep fixed backoff, continue
//!         any other failure: record, continue
//! exhausted: classify last error, return schema-shaped failure payload
//! ```
//!
//! Attempts are sequential: all models for one credential are tried before
//! the next credential is used.
//!
//! Whatever happens, callers get a value shaped like the success schema;
//! misconfiguration and total exhaustion are reported *inside* the payload.
//! The only hard error is missing caller input.

use crate::credentials::CredentialPool;
use crate::error::{ClassifiedFailure, InferenceError, InferenceResult};
use crate::extract::{extract_json_object, marker_is_truthy};
use crate::observer::{Attempt, AttemptObserver, AttemptOutcome, FinalOutcome, NullObserver};
use crate::provider::InferenceProvider;
use crate::schema::AnalysisSchema;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Model identifiers in stability-priority order, most reliable first.
///
/// Compiled-in: availability tradeoffs between these versions are a code
/// concern, not a deployment knob.
pub const MODEL_PRIORITY: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
];

/// Fixed delay after a rate-limited attempt. No growth, no jitter.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(1000);

/// The one error the orchestrator refuses to downgrade to a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// Required caller input was missing or blank. No external call is made.
    #[error("{0} is required")]
    MissingInput(&'static str),
}

/// Resilient multi-key/multi-model inference pipeline.
pub struct Orchestrator {
    provider: Arc<dyn InferenceProvider>,
    pool: CredentialPool,
    models: Vec<String>,
    backoff: Duration,
    observer: Arc<dyn AttemptObserver>,
}

impl Orchestrator {
    /// Create an orchestrator with the default model list and backoff.
    pub fn new(provider: Arc<dyn InferenceProvider>, pool: CredentialPool) -> Self {
        Self {
            provider,
            pool,
            models: MODEL_PRIORITY.iter().map(|m| m.to_string()).collect(),
            backoff: RATE_LIMIT_BACKOFF,
            observer: Arc::new(NullObserver),
        }
    }

    /// Override the model list (tests, staged rollouts).
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Override the fixed rate-limit backoff.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Attach an [`AttemptObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The credential pool this orchestrator searches.
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Run the fallback search for schema `S` over `input`.
    ///
    /// Returns `Err` only when `input` is blank. Every other outcome —
    /// success, misconfiguration, exhaustion — is a schema-shaped `Ok`.
    ///
    /// `input_name` is the caller-facing field name used in the validation
    /// error ("habit", "activity").
    pub async fn run<S: AnalysisSchema>(
        &self,
        input_name: &'static str,
        input: &str,
    ) -> Result<S, OrchestratorError> {
        if input.trim().is_empty() {
            return Err(OrchestratorError::MissingInput(input_name));
        }

        if self.pool.is_empty() {
            self.observer.on_final_outcome(&FinalOutcome::Failure {
                attempts: 0,
                failure: ClassifiedFailure::configuration(),
            });
            return Ok(S::configuration_error_payload());
        }

        let prompt = S::render_prompt(input);
        let mut last_error: Option<InferenceError> = None;
        let mut attempts = 0usize;

        for credential in self.pool.iter() {
            for model in &self.models {
                attempts += 1;
                let attempt = Attempt {
                    key_rank: credential.rank(),
                    key_suffix: credential.masked_suffix(),
                    model: model.clone(),
                };
                self.observer.on_attempt_start(&attempt);

                match self.attempt::<S>(credential, model, &prompt).await {
                    Ok(result) => {
                        self.observer
                            .on_attempt_result(&attempt, &AttemptOutcome::Accepted);
                        self.observer
                            .on_final_outcome(&FinalOutcome::Success { attempts });
                        return Ok(result);
                    }
                    Err(err) => {
                        self.observer
                            .on_attempt_result(&attempt, &AttemptOutcome::rejected(&err));
                        let rate_limited = err.is_rate_limited();
                        last_error = Some(err);
                        if rate_limited {
                            tokio::time::sleep(self.backoff).await;
                        }
                    }
                }
            }
        }

        let failure = ClassifiedFailure::from_last_error(last_error.as_ref());
        self.observer.on_final_outcome(&FinalOutcome::Failure {
            attempts,
            failure: failure.clone(),
        });
        Ok(S::failure_payload(&failure))
    }

    /// One credential × model attempt: call, extract, parse, accept.
    async fn attempt<S: AnalysisSchema>(
        &self,
        credential: &crate::credentials::Credential,
        model: &str,
        prompt: &str,
    ) -> InferenceResult<S> {
        let text = self.provider.generate(credential, model, prompt).await?;
        if text.trim().is_empty() {
            return Err(InferenceError::EmptyResponse);
        }

        let slice = extract_json_object(&text);
        let value: serde_json::Value =
            serde_json::from_str(&slice).map_err(|e| InferenceError::Parse(e.to_string()))?;

        // Parsed but incomplete output is a failure; the loop moves on.
        if !marker_is_truthy(value.get(S::PRESENCE_MARKER)) {
            return Err(InferenceError::IncompleteOutput(
                S::PRESENCE_MARKER.to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| InferenceError::Parse(e.to_string()))
    }
}
