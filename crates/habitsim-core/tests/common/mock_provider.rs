//! Deterministic stand-in for the Gemini client.
//!
//! Responses are served from a queue in FIFO order; every call is recorded
//! so tests can assert on attempt counts and ordering. An exhausted queue
//! yields an API error, which surfaces quickly as a failed assertion on the
//! attempt count rather than a hang.

use async_trait::async_trait;
use habitsim_core::credentials::Credential;
use habitsim_core::error::{InferenceError, InferenceResult};
use habitsim_core::provider::InferenceProvider;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded `generate` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub key_rank: usize,
    pub key_suffix: String,
    pub model: String,
    pub prompt: String,
}

pub struct MockProvider {
    responses: Mutex<VecDeque<InferenceResult<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProvider {
    pub fn new(responses: Vec<InferenceResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that fails every attempt with the same error.
    pub fn always_failing(err: InferenceError, attempts: usize) -> Self {
        Self::new(vec![Err(err); attempts])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
    ) -> InferenceResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            key_rank: credential.rank(),
            key_suffix: credential.masked_suffix(),
            model: model.to_string(),
            prompt: prompt.to_string(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(InferenceError::Api {
                    code: None,
                    message: "mock queue exhausted: unexpected call".to_string(),
                })
            })
    }
}
