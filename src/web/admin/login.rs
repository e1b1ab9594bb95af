use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::web::{ApiMessage, AppState};

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
}

/// Server-side check of the dashboard password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ApiMessage>)> {
    let accepted = state
        .admin_verifier()
        .is_none_or(|verifier| verifier.verify(&request.password));

    if !accepted {
        warn!("failed admin login attempt");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiMessage::new("Incorrect password")),
        ));
    }

    Ok(Json(LoginResponse {
        authenticated: true,
    }))
}
