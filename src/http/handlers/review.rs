use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AdminAccess,
    errors::{ApiError, AppError},
    intake::submit_review,
    models::{
        Pagination, PriorityReviews, RatingFilter, Review, ReviewSubmitRequest,
        ReviewSubmitResponse, ReviewsPage, review::priority_limit,
    },
    state::AppState,
};

pub async fn submit_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReviewSubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewSubmitResponse>), ApiError> {
    let Json(payload) = payload
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)).to_response())?;

    let review = submit_review(
        &payload,
        &state.submission_rules(),
        state.classifier.as_ref(),
        state.store.as_ref(),
    )
    .await
    .map_err(|e| {
        match &e {
            AppError::Validation(v) => tracing::info!("Rejected review submission: {}", v),
            other => tracing::error!("Error submitting review: {}", other),
        }
        e.to_response()
    })?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub rating: Option<String>,
}

pub async fn get_reviews_handler(
    State(state): State<AppState>,
    _access: AdminAccess,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<ReviewsPage>, ApiError> {
    let Query(query) = query
        .map_err(|e| AppError::BadRequest(format!("Invalid query: {}", e)).to_response())?;

    let pagination = Pagination::from_params(query.page, query.page_size);
    let filter = RatingFilter::from_param(query.rating.as_deref());

    let (reviews, total) = state
        .store
        .list(filter, pagination.offset(), pagination.page_size)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching reviews: {}", e);
            e.to_response()
        })?;

    Ok(Json(ReviewsPage {
        reviews,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PriorityQuery {
    pub limit: Option<i64>,
}

pub async fn get_priority_reviews_handler(
    State(state): State<AppState>,
    _access: AdminAccess,
    query: Result<Query<PriorityQuery>, QueryRejection>,
) -> Result<Json<PriorityReviews>, ApiError> {
    let Query(query) = query
        .map_err(|e| AppError::BadRequest(format!("Invalid query: {}", e)).to_response())?;
    let limit = priority_limit(query.limit);

    let (urgent_reviews, total_urgent) = state
        .store
        .list(RatingFilter::Urgent, 0, limit)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching priority reviews: {}", e);
            e.to_response()
        })?;

    Ok(Json(PriorityReviews::new(urgent_reviews, total_urgent)))
}

pub async fn get_review_handler(
    State(state): State<AppState>,
    _access: AdminAccess,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Review>, ApiError> {
    let Path(id) =
        id.map_err(|_| AppError::BadRequest("Review id must be a UUID".into()).to_response())?;

    let review = state
        .store
        .get(id)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching review {}: {}", id, e);
            e.to_response()
        })?
        .ok_or_else(|| AppError::NotFound("Review not found".into()).to_response())?;

    Ok(Json(review))
}
