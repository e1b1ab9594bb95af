use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::{FutureExt, future::BoxFuture};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordQuery, SubmissionStore};
use crate::survey::{NewSubmission, SubmissionRecord};

/// Process-local store used when no database is configured.
///
/// Records are kept in insertion order; timestamps never go backwards.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SubmissionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing record, keeping its own id and timestamp.
    #[cfg(test)]
    pub async fn push_record(&self, record: SubmissionRecord) {
        let mut guard = self.records.write().await;
        guard.push(record);
        guard.sort_by_key(|r| r.created_at);
    }

    async fn append(&self, submission: NewSubmission) -> SubmissionRecord {
        let mut guard = self.records.write().await;
        let now = Utc::now();
        let created_at = guard
            .last()
            .map(|last| last.created_at.max(now))
            .unwrap_or(now);

        let record = SubmissionRecord {
            id: Uuid::new_v4(),
            name: submission.name,
            department: submission.department.as_str().to_string(),
            scores: submission.scores,
            feedback: submission.feedback,
            created_at,
        };
        guard.push(record.clone());
        record
    }

    async fn select(&self, created_since: Option<DateTime<Utc>>) -> Vec<SubmissionRecord> {
        let guard = self.records.read().await;
        guard
            .iter()
            .rev()
            .filter(|r| created_since.is_none_or(|since| r.created_at >= since))
            .cloned()
            .collect()
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, submission: NewSubmission) -> BoxFuture<'_, Result<SubmissionRecord>> {
        async move { Ok(self.append(submission).await) }.boxed()
    }

    fn find_recent(&self, query: RecordQuery) -> BoxFuture<'_, Result<Vec<SubmissionRecord>>> {
        async move { Ok(self.select(query.created_since).await) }.boxed()
    }
}
