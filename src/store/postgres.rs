use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::{FutureExt, future::BoxFuture};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{RecordQuery, SubmissionStore};
use crate::survey::{NewSubmission, ScoreMap, SubmissionRecord};

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: Uuid,
    name: String,
    department: String,
    scores: Json<ScoreMap>,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ResponseRow> for SubmissionRecord {
    fn from(row: ResponseRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            department: row.department,
            scores: row.scores.0,
            feedback: row.feedback.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed store over the `responses` table.
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_row(&self, submission: NewSubmission) -> Result<SubmissionRecord> {
        let row = sqlx::query_as::<_, ResponseRow>(
            "INSERT INTO responses (id, name, department, scores, feedback) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, department, scores, feedback, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&submission.name)
        .bind(submission.department.as_str())
        .bind(Json(&submission.scores))
        .bind(&submission.feedback)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert response")?;

        Ok(row.into())
    }

    async fn select_rows(&self, query: RecordQuery) -> Result<Vec<SubmissionRecord>> {
        let rows = match query.created_since {
            Some(since) => sqlx::query_as::<_, ResponseRow>(
                "SELECT id, name, department, scores, feedback, created_at \
                 FROM responses \
                 WHERE created_at >= $1 \
                 ORDER BY created_at DESC, id DESC",
            )
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch responses since cutoff")?,
            None => sqlx::query_as::<_, ResponseRow>(
                "SELECT id, name, department, scores, feedback, created_at \
                 FROM responses \
                 ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch responses")?,
        };

        Ok(rows.into_iter().map(SubmissionRecord::from).collect())
    }
}

impl SubmissionStore for PgSubmissionStore {
    fn insert(&self, submission: NewSubmission) -> BoxFuture<'_, Result<SubmissionRecord>> {
        self.insert_row(submission).boxed()
    }

    fn find_recent(&self, query: RecordQuery) -> BoxFuture<'_, Result<Vec<SubmissionRecord>>> {
        self.select_rows(query).boxed()
    }
}
