use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    auth::{AuthClaims, sign_in},
    errors::{ApiError, AppError},
    models::{Claims, LoginRequest, Session},
    state::AppState,
};

pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(payload) = payload
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)).to_response())?;

    let session = sign_in(&payload, &state.config).map_err(|e| e.to_response())?;

    Ok(Json(session))
}

pub async fn session_handler(AuthClaims(claims): AuthClaims) -> Json<Claims> {
    Json(claims)
}

// stateless tokens, the client just drops it
pub async fn logout_handler(AuthClaims(claims): AuthClaims) -> StatusCode {
    tracing::info!("Admin signed out: {}", claims.email);
    StatusCode::NO_CONTENT
}
