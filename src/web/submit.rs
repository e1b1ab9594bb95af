use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    store,
    survey::SubmissionInput,
    web::{ApiFailure, AppState, json_failure},
};

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: Uuid,
}

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), (StatusCode, Json<ApiFailure>)> {
    let Json(input) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected malformed check-in body");
        json_failure(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let submission = input.validate().map_err(|err| {
        warn!(%err, "rejected invalid check-in");
        json_failure(StatusCode::BAD_REQUEST, err.to_string())
    })?;

    let department = submission.department;
    let record = store::bounded(
        state.config().store_timeout,
        "insert_submission",
        state.store().insert(submission),
    )
    .await
    .map_err(|err| {
        error!(?err, "failed to persist check-in");
        json_failure(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
    })?;

    info!(id = %record.id, department = %department, "check-in recorded");
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id: record.id,
        }),
    ))
}
