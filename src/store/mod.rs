mod memory;
mod postgres;

use std::{future::Future, time::Duration};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::survey::{NewSubmission, SubmissionRecord};

pub use memory::MemoryStore;
pub use postgres::PgSubmissionStore;

/// Filter for [`SubmissionStore::find_recent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordQuery {
    pub created_since: Option<DateTime<Utc>>,
}

impl RecordQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(created_since: DateTime<Utc>) -> Self {
        Self {
            created_since: Some(created_since),
        }
    }
}

/// Append-only record store behind the intake, stats and report paths.
pub trait SubmissionStore: Send + Sync {
    /// Persist a validated submission; the store assigns id and timestamp.
    fn insert(&self, submission: NewSubmission) -> BoxFuture<'_, Result<SubmissionRecord>>;

    /// Records matching `query`, most recent first.
    fn find_recent(&self, query: RecordQuery) -> BoxFuture<'_, Result<Vec<SubmissionRecord>>>;
}

/// Run a store call with an upper bound on how long it may take.
pub async fn bounded<T, F>(timeout: Duration, op: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| anyhow!("store call timed out after {timeout:?}"))
        .and_then(|result| result)
        .with_context(|| format!("store operation '{op}' failed"))
}
