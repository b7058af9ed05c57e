pub mod get;
pub mod post;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use super::ReviewStore;
use crate::{
    errors::AppError,
    models::{NewReview, Rating, RatingFilter, RatingSnapshot, Review},
};

pub(crate) const REVIEW_COLUMNS: &str =
    "id, rating, review_text, summary, recommended_actions, user_response, created_at";

#[derive(Debug, FromRow)]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub rating: i16,
    pub review_text: String,
    pub summary: Option<String>,
    pub recommended_actions: Option<Json<Vec<String>>>,
    pub user_response: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = AppError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(row.rating as i64).map_err(|e| {
            AppError::DatabaseError(format!("Stored review {} is corrupt: {}", row.id, e))
        })?;

        Ok(Review {
            id: row.id,
            rating,
            review_text: row.review_text,
            summary: row.summary,
            recommended_actions: row.recommended_actions.map(|Json(actions)| actions),
            user_response: row.user_response,
            created_at: row.created_at,
        })
    }
}

pub(crate) fn filter_binds(filter: RatingFilter) -> (Option<i16>, bool) {
    match filter {
        RatingFilter::Any => (None, false),
        RatingFilter::Exactly(r) => (Some(r.get() as i16), false),
        RatingFilter::Urgent => (None, true),
    }
}

pub(crate) const FILTER_CLAUSE: &str =
    "($1::SMALLINT IS NULL OR rating = $1) AND (NOT $2 OR rating IN (1, 2))";

pub(crate) const ORDER_CLAUSE: &str = "ORDER BY created_at DESC, seq DESC";

#[derive(Clone)]
pub struct PgReviewStore {
    postgres: PgPool,
}

impl PgReviewStore {
    pub fn new(postgres: PgPool) -> Self {
        Self { postgres }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        post::insert_review(review, &self.postgres).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        get::get_review_by_id(id, &self.postgres).await
    }

    async fn list(
        &self,
        filter: RatingFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<Review>, u64), AppError> {
        let reviews = get::get_reviews(filter, offset, Some(limit as i64), &self.postgres).await?;
        let total = get::count_reviews(filter, &self.postgres).await?;
        Ok((reviews, total))
    }

    async fn list_all(
        &self,
        filter: RatingFilter,
        max_rows: usize,
    ) -> Result<Vec<Review>, AppError> {
        get::get_reviews(filter, 0, Some(max_rows as i64), &self.postgres).await
    }

    async fn rating_snapshot(&self) -> Result<RatingSnapshot, AppError> {
        let samples = get::get_rating_samples(&self.postgres).await?;
        let taken_at = get::get_database_now(&self.postgres).await?;
        Ok(RatingSnapshot { samples, taken_at })
    }
}
