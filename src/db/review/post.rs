use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{REVIEW_COLUMNS, ReviewRow};
use crate::{
    errors::AppError,
    models::{NewReview, Review},
};

pub async fn insert_review(review: NewReview, postgres: &PgPool) -> Result<Review, AppError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews (id, rating, review_text, summary, recommended_actions, user_response)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(id)
    .bind(review.rating.get() as i16)
    .bind(&review.review_text)
    .bind(&review.summary)
    .bind(review.recommended_actions.map(Json))
    .bind(&review.user_response)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create review: {}", e)))?;

    tracing::info!("Created review {} (rating {})", row.id, row.rating);

    Review::try_from(row)
}
