use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, cron, submit, survey};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/survey", get(survey::survey_definition))
        .route("/api/submit", post(submit::submit))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/export.csv", get(admin::export_csv))
        .route("/api/cron/weekly-report", get(cron::weekly_report))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
