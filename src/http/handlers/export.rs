use axum::{
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, header},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    auth::AdminAccess,
    errors::{ApiError, AppError},
    export::{csv_stream, export_filename, load_export},
    models::RatingFilter,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub rating: Option<String>,
}

pub async fn export_reviews_handler(
    State(state): State<AppState>,
    _access: AdminAccess,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query
        .map_err(|e| AppError::BadRequest(format!("Invalid query: {}", e)).to_response())?;
    let filter = RatingFilter::from_param(query.rating.as_deref());

    let reviews = load_export(state.store.as_ref(), filter, state.config.export_max_rows)
        .await
        .map_err(|e| {
            tracing::error!("Error exporting reviews: {}", e);
            e.to_response()
        })?;

    tracing::info!("Exporting {} reviews", reviews.len());

    let disposition = format!("attachment; filename={}", export_filename(Utc::now()));
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|_| AppError::InternalError.to_response())?;

    let mut response = Response::new(Body::from_stream(csv_stream(reviews)));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok(response)
}
