use axum::{Json, extract::State};

use crate::{
    analytics::get_analytics, auth::AdminAccess, errors::ApiError, models::AnalyticsResponse,
    state::AppState,
};

pub async fn get_analytics_handler(
    State(state): State<AppState>,
    _access: AdminAccess,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let analytics = get_analytics(state.store.as_ref()).await.map_err(|e| {
        tracing::error!("Error fetching analytics: {}", e);
        e.to_response()
    })?;

    Ok(Json(analytics))
}
