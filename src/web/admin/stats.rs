use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::error;

use crate::{
    stats::{StatsSnapshot, compute_stats},
    store::{self, RecordQuery},
    web::{ApiError, AppState, auth::BearerHeader, json_error},
};

use super::auth::require_admin;

/// Dashboard figures, computed fresh on every request.
pub async fn stats(
    State(state): State<AppState>,
    bearer: Option<BearerHeader>,
) -> Result<Json<StatsSnapshot>, (StatusCode, Json<ApiError>)> {
    require_admin(&state, bearer.as_ref())?;

    let records = store::bounded(
        state.config().store_timeout,
        "dashboard_stats",
        state.store().find_recent(RecordQuery::all()),
    )
    .await
    .map_err(|err| {
        error!(?err, "failed to load check-ins for stats");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch")
    })?;

    let now = Utc::now().with_timezone(&state.config().report.utc_offset);
    Ok(Json(compute_stats(&records, now)))
}
