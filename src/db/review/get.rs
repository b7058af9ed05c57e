use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{FILTER_CLAUSE, ORDER_CLAUSE, REVIEW_COLUMNS, ReviewRow, filter_binds};
use crate::{
    errors::AppError,
    models::{Rating, RatingFilter, RatingSample, Review},
};

pub async fn get_review_by_id(id: Uuid, postgres: &PgPool) -> Result<Option<Review>, AppError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch review: {}", e)))?;

    row.map(Review::try_from).transpose()
}

pub async fn get_reviews(
    filter: RatingFilter,
    offset: u64,
    limit: Option<i64>,
    postgres: &PgPool,
) -> Result<Vec<Review>, AppError> {
    let (rating, urgent_only) = filter_binds(filter);

    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS}
			FROM reviews
			WHERE {FILTER_CLAUSE}
			{ORDER_CLAUSE}
			LIMIT $3 OFFSET $4"
    ))
    .bind(rating)
    .bind(urgent_only)
    .bind(limit)
    .bind(offset.min(i64::MAX as u64) as i64)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch reviews: {}", e)))?;

    rows.into_iter().map(Review::try_from).collect()
}

pub async fn count_reviews(filter: RatingFilter, postgres: &PgPool) -> Result<u64, AppError> {
    let (rating, urgent_only) = filter_binds(filter);

    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM reviews WHERE {FILTER_CLAUSE}"
    ))
    .bind(rating)
    .bind(urgent_only)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to count reviews: {}", e)))?;

    Ok(total.max(0) as u64)
}

pub async fn get_rating_samples(postgres: &PgPool) -> Result<Vec<RatingSample>, AppError> {
    let rows = sqlx::query_as::<_, (i16, DateTime<Utc>)>("SELECT rating, created_at FROM reviews")
        .fetch_all(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch ratings: {}", e)))?;

    rows.into_iter()
        .map(|(rating, created_at)| {
            let rating = Rating::new(rating as i64)
                .map_err(|e| AppError::DatabaseError(format!("Corrupt rating: {}", e)))?;
            Ok(RatingSample { rating, created_at })
        })
        .collect()
}

pub async fn get_database_now(postgres: &PgPool) -> Result<DateTime<Utc>, AppError> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT now()")
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to read database clock: {}", e)))
}
