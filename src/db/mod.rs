pub mod init;
pub mod memory;
pub mod review;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{NewReview, RatingFilter, RatingSnapshot, Review},
};

pub use memory::MemoryReviewStore;
pub use review::PgReviewStore;

// Listings are newest first; created_at ties go to the later insert.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Review>, AppError>;

    async fn list(
        &self,
        filter: RatingFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<Review>, u64), AppError>;

    async fn list_all(&self, filter: RatingFilter, max_rows: usize)
    -> Result<Vec<Review>, AppError>;

    async fn rating_snapshot(&self) -> Result<RatingSnapshot, AppError>;
}
