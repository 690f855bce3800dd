//! Inference provider trait.
//!
//! The orchestrator drives any backend that can turn a rendered prompt into
//! raw text. Keeping the seam at "one credential, one model, one prompt"
//! means the fallback search stays provider-agnostic and tests can swap in a
//! deterministic mock.

use crate::credentials::Credential;
use crate::error::{InferenceError, InferenceResult};
use async_trait::async_trait;

/// A remote (or mock) generative-inference backend.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name, used in diagnostics.
    fn name(&self) -> &str;

    /// Run a single-turn completion against `model`, authorised by
    /// `credential`, requesting JSON-formatted output.
    ///
    /// Returns the raw text payload; extraction and parsing are the
    /// orchestrator's job. Errors carry an HTTP-style status code where one
    /// was received.
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
    ) -> InferenceResult<String>;

    /// List the model identifiers visible to `credential`.
    ///
    /// Used only by the diagnostics endpoint; providers without a listing
    /// API can keep the default.
    async fn list_models(&self, _credential: &Credential) -> InferenceResult<Vec<String>> {
        Err(InferenceError::Unsupported(self.name().to_string()))
    }
}
