use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, warn};

use crate::{
    report::{ReportOutcome, generate_weekly_report},
    web::{
        ApiFailure, AppState,
        auth::{BearerHeader, bearer_authorized},
        json_failure,
    },
};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WeeklyReportResponse {
    Sent { success: bool, count: usize },
    Skipped { success: bool, message: &'static str },
}

/// Externally triggered weekly report; authenticated before any data is read.
pub async fn weekly_report(
    State(state): State<AppState>,
    bearer: Option<BearerHeader>,
) -> Result<Json<WeeklyReportResponse>, (StatusCode, Json<ApiFailure>)> {
    if !bearer_authorized(bearer.as_ref(), state.cron_verifier()) {
        warn!("rejected weekly report trigger with invalid credentials");
        return Err(json_failure(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    match generate_weekly_report(&state, Utc::now()).await {
        Ok(ReportOutcome::Sent { count }) => Ok(Json(WeeklyReportResponse::Sent {
            success: true,
            count,
        })),
        Ok(ReportOutcome::Skipped) => Ok(Json(WeeklyReportResponse::Skipped {
            success: true,
            message: "skipped",
        })),
        Err(err) => {
            error!(?err, "weekly report failed");
            Err(json_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate weekly report",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        report::mailer::testing::RecordingMailer,
        store::MemoryStore,
        survey::{ScoreMap, SubmissionRecord},
        web::{
            router::build_router,
            test_support::{TEST_CRON_SECRET, failing_state, read_json, test_state},
        },
    };

    fn trigger(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get("/api/cron/weekly-report");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .push_record(SubmissionRecord {
                id: Uuid::new_v4(),
                name: "Jo".into(),
                department: "Finance".into(),
                scores: ScoreMap::from([("q1".to_string(), 3)]),
                feedback: String::new(),
                created_at: Utc::now() - Duration::hours(3),
            })
            .await;
        store
    }

    #[tokio::test]
    async fn wrong_token_is_rejected_and_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(seeded_store().await, mailer.clone()));

        let response = app.oneshot(trigger(Some("wrong"))).await.unwrap();
        assert_eq!(response.status(), 401);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(seeded_store().await, mailer.clone()));

        let response = app.oneshot(trigger(None)).await.unwrap();
        assert_eq!(response.status(), 401);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn empty_window_reports_skipped() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(Arc::new(MemoryStore::new()), mailer.clone()));

        let response = app.oneshot(trigger(Some(TEST_CRON_SECRET))).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "skipped");
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn valid_token_sends_report() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(seeded_store().await, mailer.clone()));

        let response = app.oneshot(trigger(Some(TEST_CRON_SECRET))).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_returns_server_error_and_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(failing_state(mailer.clone()));

        let response = app.oneshot(trigger(Some(TEST_CRON_SECRET))).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(read_json(response).await["success"], false);
        assert!(mailer.sent().is_empty());
    }
}
