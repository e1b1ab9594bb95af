use axum::{Json, http::StatusCode};
use tracing::warn;

use crate::web::{
    ApiError, AppState,
    auth::{BearerHeader, bearer_authorized},
    json_error,
};

/// Admin gate for the dashboard endpoints.
///
/// Passes everything when no admin credential is configured.
pub fn require_admin(
    state: &AppState,
    bearer: Option<&BearerHeader>,
) -> Result<(), (StatusCode, Json<ApiError>)> {
    let Some(verifier) = state.admin_verifier() else {
        return Ok(());
    };

    if bearer_authorized(bearer, verifier) {
        Ok(())
    } else {
        warn!("rejected admin request with invalid credentials");
        Err(json_error(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
