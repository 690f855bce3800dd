//! Shared test doubles for the orchestrator integration suite.

pub mod mock_provider;
pub mod recording_observer;
