use sqlx::PgPool;

use crate::errors::AppError;

const CREATE_REVIEWS: &str = "CREATE TABLE IF NOT EXISTS reviews (
    seq BIGSERIAL NOT NULL,
    id UUID PRIMARY KEY,
    rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
    review_text TEXT NOT NULL,
    summary TEXT,
    recommended_actions JSONB,
    user_response TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_CREATED_AT_INDEX: &str = "CREATE INDEX IF NOT EXISTS reviews_created_at_idx
    ON reviews (created_at DESC, seq DESC)";

const CREATE_RATING_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS reviews_rating_idx ON reviews (rating)";

pub async fn initialize_schema(postgres: &PgPool) -> Result<(), AppError> {
    tracing::info!("Ensuring reviews schema...");

    for statement in [CREATE_REVIEWS, CREATE_CREATED_AT_INDEX, CREATE_RATING_INDEX] {
        sqlx::query(statement)
            .execute(postgres)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to prepare schema: {}", e)))?;
    }

    tracing::info!("Reviews schema ready");
    Ok(())
}
