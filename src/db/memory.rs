use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ReviewStore;
use crate::{
    errors::AppError,
    models::{NewReview, RatingFilter, RatingSample, RatingSnapshot, Review},
};

#[derive(Clone, Default)]
pub struct MemoryReviewStore {
    rows: Arc<Mutex<Vec<Review>>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_at(&self, review: NewReview, created_at: DateTime<Utc>) -> Review {
        let stored = Review {
            id: Uuid::new_v4(),
            rating: review.rating,
            review_text: review.review_text,
            summary: review.summary,
            recommended_actions: review.recommended_actions,
            user_response: review.user_response,
            created_at,
        };

        let mut rows = self.rows.lock().await;
        // Keep the vector sorted by created_at; equal timestamps stay in insertion order.
        let pos = rows.partition_point(|r| r.created_at <= created_at);
        rows.insert(pos, stored.clone());
        stored
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        Ok(self.insert_at(review, Utc::now()).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: RatingFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<Review>, u64), AppError> {
        let rows = self.rows.lock().await;
        let matching = rows.iter().rev().filter(|r| filter.matches(r.rating));
        let total = matching.clone().count() as u64;
        let page = matching
            .skip(offset.min(usize::MAX as u64) as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn list_all(
        &self,
        filter: RatingFilter,
        max_rows: usize,
    ) -> Result<Vec<Review>, AppError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| filter.matches(r.rating))
            .take(max_rows)
            .cloned()
            .collect())
    }

    async fn rating_snapshot(&self) -> Result<RatingSnapshot, AppError> {
        let rows = self.rows.lock().await;
        let samples = rows
            .iter()
            .map(|r| RatingSample {
                rating: r.rating,
                created_at: r.created_at,
            })
            .collect();
        Ok(RatingSnapshot {
            samples,
            taken_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use chrono::Duration;

    fn review(rating: i64, text: &str) -> NewReview {
        NewReview {
            rating: Rating::new(rating).unwrap(),
            review_text: text.into(),
            summary: None,
            recommended_actions: None,
            user_response: "Thanks".into(),
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_ties_in_reverse_insertion_order() {
        let store = MemoryReviewStore::new();
        let t0 = Utc::now() - Duration::hours(1);
        store.insert_at(review(3, "first"), t0).await;
        store.insert_at(review(3, "second"), t0).await;
        store
            .insert_at(review(3, "older"), t0 - Duration::minutes(5))
            .await;
        store
            .insert_at(review(3, "newest"), t0 + Duration::minutes(5))
            .await;

        let (page, total) = store.list(RatingFilter::Any, 0, 10).await.unwrap();
        let texts: Vec<_> = page.iter().map(|r| r.review_text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "second", "first", "older"]);
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn list_counts_before_paginating() {
        let store = MemoryReviewStore::new();
        for i in 0..7 {
            store
                .insert(review(if i % 2 == 0 { 1 } else { 4 }, "text"))
                .await
                .unwrap();
        }

        let urgent = RatingFilter::Urgent;
        let (page, total) = store.list(urgent, 2, 10).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 2);

        let (page, total) = store.list(urgent, 40, 10).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 4);

        assert_eq!(store.list_all(RatingFilter::Any, 5).await.unwrap().len(), 5);
    }
}
