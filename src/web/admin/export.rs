use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    report::attachments::{CSV_CONTENT_TYPE, render_csv},
    store::{self, RecordQuery},
    web::{AppState, auth::BearerHeader, json_error},
};

use super::auth::require_admin;

const EXPORT_FILENAME: &str = "happy_meter_responses.csv";

/// Every stored check-in as a CSV download.
pub async fn export_csv(State(state): State<AppState>, bearer: Option<BearerHeader>) -> Response {
    if let Err(rejection) = require_admin(&state, bearer.as_ref()) {
        return rejection.into_response();
    }

    let records = match store::bounded(
        state.config().store_timeout,
        "export_csv",
        state.store().find_recent(RecordQuery::all()),
    )
    .await
    {
        Ok(records) => records,
        Err(err) => {
            error!(?err, "failed to load check-ins for export");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch").into_response();
        }
    };

    match render_csv(&records, state.config().report.utc_offset) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, format!("{CSV_CONTENT_TYPE}; charset=utf-8")),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILENAME}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            error!(?err, "failed to render export CSV");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::{
        report::mailer::testing::RecordingMailer,
        store::{MemoryStore, SubmissionStore},
        survey::{Department, NewSubmission, ScoreMap},
        web::{
            router::build_router,
            test_support::{guarded_state, read_body, test_state},
        },
    };

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(NewSubmission {
                name: "Kim".into(),
                department: Department::Finance,
                scores: ScoreMap::from([("q1".to_string(), 4)]),
                feedback: String::new(),
            })
            .await
            .unwrap();
        let app = build_router(test_state(store, Arc::new(RecordingMailer::default())));

        let response = app
            .oneshot(
                Request::get("/api/admin/export.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("happy_meter_responses.csv"));

        let text = String::from_utf8(read_body(response).await).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Kim,Finance,4,"));
    }

    #[tokio::test]
    async fn guarded_export_rejects_anonymous_requests() {
        let app = build_router(guarded_state(Arc::new(MemoryStore::new())));
        let response = app
            .oneshot(
                Request::get("/api/admin/export.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
    }
}
