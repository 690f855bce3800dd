//! Error types for the inference pipeline.
//!
//! Two layers live here:
//!
//! - [`InferenceError`] — what a single upstream attempt can produce. These
//!   are caught and recorded inside the orchestrator loop, never propagated
//!   to callers directly.
//! - [`ClassifiedFailure`] — the terminal classification assigned after all
//!   credential × model combinations are exhausted. Carries a caller-visible
//!   message that is truncated and stripped of vendor prefixes.

use thiserror::Error;

/// Maximum length of the caller-visible failure message.
pub const MAX_FAILURE_MESSAGE_LEN: usize = 100;

/// Upstream error prefixes stripped before a message is shown to callers.
const VENDOR_PREFIXES: [&str; 2] = ["Gemini API error:", "GoogleGenerativeAI Error:"];

/// Error produced by a single inference attempt.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// The remote service answered with a non-success HTTP status.
    #[error("API error: {message} (code: {code:?})")]
    Api { code: Option<u16>, message: String },

    /// Transport-level failure before any HTTP status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The transport's default timeout elapsed.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// A successful call carried no text content.
    #[error("no text content")]
    EmptyResponse,

    /// The extracted payload was not valid JSON, or did not fit the schema.
    #[error("malformed structured output: {0}")]
    Parse(String),

    /// Valid JSON, but the presence-marker field was missing or empty.
    ///
    /// Treated as a failure so the loop moves on rather than returning a
    /// partial object.
    #[error("incomplete structured output: missing '{0}'")]
    IncompleteOutput(String),

    /// The provider does not implement the requested operation.
    #[error("operation not supported by provider {0}")]
    Unsupported(String),
}

impl InferenceError {
    /// Whether this attempt hit upstream rate limiting.
    ///
    /// Matches on the HTTP status as well as the message text, since quota
    /// errors sometimes surface as a 400 with "quota" in the body.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { code: Some(429), .. } => true,
            Self::Api { message, .. } => {
                let msg = message.to_lowercase();
                msg.contains("429") || msg.contains("quota")
            }
            _ => false,
        }
    }
}

/// Result alias for inference operations.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Terminal failure categories (assigned after exhausting all attempts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable credentials configured. Terminal; no attempt is made.
    Configuration,
    /// Credential invalid, revoked, or leaked (403 / permission errors).
    Authorization,
    /// Upstream rate limiting or quota exhaustion (429).
    RateLimited,
    /// Model unavailable to this credential (404).
    NotFound,
    /// Output never parsed into the expected shape.
    Parse,
    /// Catch-all.
    Unknown,
}

/// A classified terminal failure with its caller-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ClassifiedFailure {
    /// Failure reported when the candidate credential list is empty.
    pub fn configuration() -> Self {
        Self {
            kind: FailureKind::Configuration,
            message: "No API keys configured".to_string(),
        }
    }

    /// Classify the last error seen during an exhausted search.
    ///
    /// `None` means every attempt failed without a recorded error, which can
    /// only happen with an empty model list.
    pub fn from_last_error(last: Option<&InferenceError>) -> Self {
        let Some(err) = last else {
            return Self {
                kind: FailureKind::Unknown,
                message: "All models provided by keys failed".to_string(),
            };
        };

        let raw = err.to_string();
        let msg = raw.to_lowercase();

        match err {
            InferenceError::Parse(detail) => {
                return Self {
                    kind: FailureKind::Parse,
                    message: sanitize_message(detail),
                };
            }
            InferenceError::IncompleteOutput(_) => {
                return Self {
                    kind: FailureKind::Parse,
                    message: sanitize_message(&raw),
                };
            }
            _ => {}
        }

        let has_code = |c: u16| matches!(err, InferenceError::Api { code: Some(n), .. } if *n == c);

        if has_code(403) || msg.contains("403") || msg.contains("permission") || msg.contains("leaked")
        {
            Self {
                kind: FailureKind::Authorization,
                message: "Invalid API Key (Key Revoked/Leaked)".to_string(),
            }
        } else if err.is_rate_limited() {
            Self {
                kind: FailureKind::RateLimited,
                message: "Rate Limit Exceeded".to_string(),
            }
        } else if has_code(404) || msg.contains("404") || msg.contains("not found") {
            Self {
                kind: FailureKind::NotFound,
                message: "Model Not Found (Check API Access)".to_string(),
            }
        } else {
            Self {
                kind: FailureKind::Unknown,
                message: sanitize_message(&raw),
            }
        }
    }
}

/// Strip known vendor prefixes and bound the message length.
fn sanitize_message(raw: &str) -> String {
    let mut msg = raw.to_string();
    for prefix in VENDOR_PREFIXES {
        msg = msg.replace(prefix, "");
    }
    msg.trim().chars().take(MAX_FAILURE_MESSAGE_LEN).collect()
}
