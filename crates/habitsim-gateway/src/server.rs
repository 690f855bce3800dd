//! Axum HTTP surface over the inference pipeline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check — always `200 OK`. |
//! | `POST` | `/api/habit-replacement` | `{ "habit": "..." }` → [`HabitReplacement`]. |
//! | `POST` | `/api/risk` | `{ "activity": "..." }` → [`RiskAssessment`]. |
//! | `GET`  | `/api/history` | Analyses recorded for the calling user. |
//! | `GET`  | `/api/doctor` | Credential slot presence and upstream model listing. |
//!
//! Both analysis endpoints answer `200` for success *and* for classified
//! pipeline failures — the payload is always shaped like the success schema
//! so the UI needs no error branch. `400` is reserved for a missing input
//! field.

use crate::error::{GatewayError, GatewayResult};
use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use habitsim_core::history::AnalysisRecord;
use habitsim_core::schema::AnalysisSchema;
use habitsim_core::{HabitReplacement, HistoryStore, InferenceProvider, Orchestrator, RiskAssessment};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Shared application state
// ─────────────────────────────────────────────────────────────────────────────

/// Shared state injected into every handler via the [`State`] extractor.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    provider: Arc<dyn InferenceProvider>,
    history: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        provider: Arc<dyn InferenceProvider>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            orchestrator,
            provider,
            history,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime configuration for [`serve`].
pub struct ServerConfig {
    /// TCP port to listen on (default: 3000).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Build the axum [`Router`] over the given state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/habit-replacement", post(habit_replacement_handler))
        .route("/api/risk", post(risk_handler))
        .route("/api/history", get(history_handler))
        .route("/api/doctor", get(doctor_handler))
        .with_state(state)
}

/// Bind to `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(config: ServerConfig, state: AppState) -> std::io::Result<()> {
    let app = build_app(state);
    let addr = format!("0.0.0.0:{}", config.port);
    info!(addr = %addr, "habitsim gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HabitRequest {
    habit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RiskRequest {
    activity: Option<String>,
}

/// `GET /health` — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "habitsim-gateway" }))
}

/// `POST /api/habit-replacement`
async fn habit_replacement_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<HabitRequest>,
) -> GatewayResult<Json<HabitReplacement>> {
    let habit = req.habit.unwrap_or_default();
    let result: HabitReplacement = state.orchestrator.run("habit", &habit).await?;
    record_history(&state, &headers, &habit, &result).await;
    Ok(Json(result))
}

/// `POST /api/risk`
async fn risk_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RiskRequest>,
) -> GatewayResult<Json<RiskAssessment>> {
    let activity = req.activity.unwrap_or_default();
    let result: RiskAssessment = state.orchestrator.run("activity", &activity).await?;
    record_history(&state, &headers, &activity, &result).await;
    Ok(Json(result))
}

/// `GET /api/history` — analyses recorded for the calling user.
async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> GatewayResult<Json<Vec<AnalysisRecord>>> {
    let user_id = caller_id(&headers);
    let records = state
        .history
        .list_for_user(&user_id)
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))?;
    Ok(Json(records))
}

/// `GET /api/doctor` — configuration diagnostics.
///
/// Reports which credential slots held usable values at startup (masked
/// suffixes only) and, when a credential exists, the model identifiers the
/// upstream service lists for it.
async fn doctor_handler(State(state): State<AppState>) -> impl IntoResponse {
    let pool = state.orchestrator.pool();
    let slots: Vec<serde_json::Value> = pool
        .slot_statuses()
        .iter()
        .map(|s| {
            json!({
                "slot": s.slot,
                "present": s.present,
                "suffix": s.suffix,
            })
        })
        .collect();

    let models = match pool.best() {
        Some(credential) => match state.provider.list_models(credential).await {
            Ok(models) => json!({ "models": models }),
            Err(e) => json!({ "error": e.to_string() }),
        },
        None => json!({ "error": "no credentials configured" }),
    };

    Json(json!({
        "service": "habitsim-gateway",
        "credentials": pool.len(),
        "slots": slots,
        "upstream": models,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Caller identity from the session layer's `x-user-id` header.
///
/// Authentication itself lives in front of this service; absent the header,
/// history is bucketed under a shared anonymous user.
fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Record an analysis outcome. Failures are logged, never surfaced — the
/// analysis result has already been produced and belongs to the caller.
async fn record_history<S: AnalysisSchema>(
    state: &AppState,
    headers: &HeaderMap,
    input: &str,
    result: &S,
) {
    let Ok(value) = serde_json::to_value(result) else {
        return;
    };
    let record = AnalysisRecord::new(caller_id(headers), S::NAME, input, value);
    if let Err(e) = state.history.record(record).await {
        warn!(error = %e, schema = S::NAME, "failed to record analysis history");
    }
}
