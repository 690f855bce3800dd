//! Habit Consequence Simulator — HTTP gateway.
//!
//! Thin axum surface over [`habitsim_core`]: two analysis endpoints, a
//! health probe, configuration diagnostics, and per-user history. See
//! [`server`] for the endpoint table.

pub mod error;
pub mod server;

pub use error::{GatewayError, GatewayResult};
pub use server::{AppState, ServerConfig, build_app, serve};
