//! Per-user analysis history.
//!
//! The production deployment persists history through a managed backend the
//! gateway talks to over a narrow interface; [`HistoryStore`] is that
//! interface, and [`InMemoryHistoryStore`] backs it for development and
//! tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage error: {0}")]
    Storage(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// One recorded analysis, success or schema-shaped failure alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub user_id: String,
    /// Schema name (`habit-replacement` or `risk`).
    pub kind: String,
    /// The caller-supplied habit or activity description.
    pub input: String,
    /// The structured result returned to the caller.
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        user_id: impl Into<String>,
        kind: impl Into<String>,
        input: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind: kind.into(),
            input: input.into(),
            result,
            created_at: Utc::now(),
        }
    }
}

/// Narrow persistence interface for analysis history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn record(&self, record: AnalysisRecord) -> HistoryResult<()>;

    /// Records for one user, newest first.
    async fn list_for_user(&self, user_id: &str) -> HistoryResult<Vec<AnalysisRecord>>;
}

/// In-memory store, newest-first per user.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn record(&self, record: AnalysisRecord) -> HistoryResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> HistoryResult<Vec<AnalysisRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<AnalysisRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        matching.reverse();
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_are_listed_per_user_newest_first() {
        let store = InMemoryHistoryStore::new();
        store
            .record(AnalysisRecord::new("alice", "risk", "skipping sleep", json!({"healthScore": 40})))
            .await
            .unwrap();
        store
            .record(AnalysisRecord::new("bob", "risk", "cycling", json!({"healthScore": 90})))
            .await
            .unwrap();
        store
            .record(AnalysisRecord::new(
                "alice",
                "habit-replacement",
                "doomscrolling",
                json!({"replacement": "reading"}),
            ))
            .await
            .unwrap();

        let alice = store.list_for_user("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].kind, "habit-replacement");
        assert_eq!(alice[1].input, "skipping sleep");

        let nobody = store.list_for_user("carol").await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn record_ids_are_unique() {
        let a = AnalysisRecord::new("u", "risk", "x", json!({}));
        let b = AnalysisRecord::new("u", "risk", "x", json!({}));
        assert_ne!(a.id, b.id);
    }
}
