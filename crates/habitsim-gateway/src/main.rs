//! Habit Consequence Simulator gateway — entry point.
//!
//! Reads configuration from environment variables and starts the axum
//! service.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HABITSIM_PORT` | `3000` | TCP port to listen on. |
//! | `GEMINI_API_KEY3` | *(none)* | Credential slot, highest priority. |
//! | `GEMINI_API_KEY` | *(none)* | Credential slot. |
//! | `GEMINI_API_KEY2` | *(none)* | Credential slot. |
//! | `GEMINI_API_KEY_FALLBACK` | *(none)* | Credential slot, lowest priority. |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` | Upstream base URL. |

use habitsim_gateway::server::{AppState, ServerConfig, serve};
use habitsim_core::{
    CredentialPool, GeminiClient, InMemoryHistoryStore, Orchestrator, TracingObserver,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("habitsim_gateway=info".parse().unwrap())
                .add_directive("habitsim_core=info".parse().unwrap()),
        )
        .init();

    let port: u16 = std::env::var("HABITSIM_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let pool = CredentialPool::from_env();
    if pool.is_empty() {
        tracing::warn!(
            "no usable GEMINI_API_KEY* credentials found — analysis endpoints \
             will answer with configuration-error payloads"
        );
    }

    info!(
        port = port,
        credentials = pool.len(),
        "habitsim gateway configuration loaded"
    );

    let provider = Arc::new(GeminiClient::from_env());
    let orchestrator = Arc::new(
        Orchestrator::new(provider.clone(), pool).with_observer(Arc::new(TracingObserver)),
    );
    let history = Arc::new(InMemoryHistoryStore::new());

    let state = AppState::new(orchestrator, provider, history);

    if let Err(e) = serve(ServerConfig { port }, state).await {
        eprintln!("gateway error: {e}");
        std::process::exit(1);
    }
}
