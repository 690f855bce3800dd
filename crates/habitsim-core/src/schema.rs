//! Structured result schemas and their prompt contracts.
//!
//! The remote service cannot be forced to honour an output schema, so each
//! schema embeds its own machine-readable description in the prompt text and
//! names a *presence marker* — the one field whose truthy value is the sole
//! criterion for accepting a parsed response.
//!
//! Every schema also knows how to render itself as a failure: callers always
//! receive the full field set, populated with human-readable diagnostics,
//! so the UI needs no special-case error branch.

use crate::error::ClassifiedFailure;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Contract between the orchestrator and one analysis use case.
pub trait AnalysisSchema: Serialize + DeserializeOwned + Send + 'static {
    /// Short name used in logs and history records.
    const NAME: &'static str;

    /// Field whose truthy value accepts a parsed response.
    const PRESENCE_MARKER: &'static str;

    /// Render the full prompt for the caller-supplied input.
    fn render_prompt(input: &str) -> String;

    /// Schema-shaped payload carrying a classified failure.
    fn failure_payload(failure: &ClassifiedFailure) -> Self;

    /// Schema-shaped payload for the no-credentials fast path.
    fn configuration_error_payload() -> Self {
        Self::failure_payload(&ClassifiedFailure::configuration())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Habit replacement
// ─────────────────────────────────────────────────────────────────────────────

/// Replacement habit suggestion with a three-step plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitReplacement {
    pub replacement: String,
    pub plan: Vec<String>,
    #[serde(rename = "microSteps")]
    pub micro_steps: Vec<String>,
}

impl AnalysisSchema for HabitReplacement {
    const NAME: &'static str = "habit-replacement";
    const PRESENCE_MARKER: &'static str = "replacement";

    fn render_prompt(input: &str) -> String {
        format!(
            r#"You are a habit replacement expert.
For the negative habit: "{input}", suggest:
1. An easy replacement habit.
2. A gradual improvement plan (3 distinct steps).
3. 3 daily micro-steps to get started.

Return ONLY valid JSON in this format:
{{
  "replacement": "Short description of replacement habit DO NOT USE MARKDOWN",
  "plan": ["Step 1 description", "Step 2 description", "Step 3 description"],
  "microSteps": ["Micro-step 1", "Micro-step 2", "Micro-step 3"]
}}"#
        )
    }

    fn failure_payload(failure: &ClassifiedFailure) -> Self {
        Self {
            replacement: format!("AI Error: {}", failure.message),
            plan: vec![
                "Check server logs".to_string(),
                "Verify API key".to_string(),
                "Restart server".to_string(),
            ],
            micro_steps: vec![
                "Error 1".to_string(),
                "Error 2".to_string(),
                "Error 3".to_string(),
            ],
        }
    }

    fn configuration_error_payload() -> Self {
        Self {
            replacement: "Configuration Error: No API keys configured".to_string(),
            plan: vec![
                "Check environment variables".to_string(),
                "Restart server".to_string(),
                "Add GEMINI_API_KEY".to_string(),
            ],
            micro_steps: vec![
                "Missing key".to_string(),
                "No env var".to_string(),
                "Server restart needed".to_string(),
            ],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Risk assessment
// ─────────────────────────────────────────────────────────────────────────────

/// Risk category reported by the assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Reported in place of a level when the pipeline itself failed.
    #[default]
    Error,
}

/// Health risk assessment of an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    #[serde(rename = "shortTerm")]
    pub short_term: Vec<String>,
    #[serde(rename = "longTerm")]
    pub long_term: Vec<String>,
    #[serde(rename = "healthScore")]
    pub health_score: u8,
}

impl AnalysisSchema for RiskAssessment {
    const NAME: &'static str = "risk";
    const PRESENCE_MARKER: &'static str = "riskLevel";

    fn render_prompt(input: &str) -> String {
        format!(
            r#"Analyze the health risk of: "{input}".
Return ONLY valid JSON in this format:
{{
  "riskLevel": "Low" or "Medium" or "High",
  "shortTerm": ["Immediate impact 1", "Immediate impact 2"],
  "longTerm": ["Long term consequence 1", "Long term consequence 2"],
  "healthScore": 0-100 (integer)
}}"#
        )
    }

    fn failure_payload(failure: &ClassifiedFailure) -> Self {
        Self {
            risk_level: RiskLevel::Error,
            short_term: vec![format!("Error: {}", failure.message)],
            long_term: vec!["Check server logs".to_string()],
            health_score: 0,
        }
    }
}
