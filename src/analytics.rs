use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::{
    db::ReviewStore,
    errors::AppError,
    models::{AnalyticsResponse, Rating, RatingSample},
};

pub async fn get_analytics(store: &dyn ReviewStore) -> Result<AnalyticsResponse, AppError> {
    let snapshot = store.rating_snapshot().await?;
    Ok(summarize_ratings(&snapshot.samples, snapshot.taken_at))
}

// recent window is [now - 24h, now)
pub fn summarize_ratings(samples: &[RatingSample], now: DateTime<Utc>) -> AnalyticsResponse {
    let mut rating_distribution: BTreeMap<u8, u64> =
        Rating::ALL.iter().map(|r| (r.get(), 0)).collect();

    let window_start = now - Duration::hours(24);
    let mut sum = 0u64;
    let mut recent_reviews_count = 0u64;

    for sample in samples {
        *rating_distribution.entry(sample.rating.get()).or_default() += 1;
        sum += sample.rating.get() as u64;
        if sample.created_at >= window_start && sample.created_at < now {
            recent_reviews_count += 1;
        }
    }

    let total_reviews = samples.len() as u64;
    let average_rating = if total_reviews > 0 {
        round2(sum as f64 / total_reviews as f64)
    } else {
        0.0
    };

    AnalyticsResponse {
        total_reviews,
        average_rating,
        rating_distribution,
        recent_reviews_count,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryReviewStore,
        models::{NewReview, RatingFilter, RatingSnapshot, Review},
    };
    use async_trait::async_trait;
    use uuid::Uuid;

    // Store whose clock runs ahead of the application host.
    struct SkewedStore {
        inner: MemoryReviewStore,
        skew: Duration,
    }

    #[async_trait]
    impl ReviewStore for SkewedStore {
        async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
            Ok(self.inner.insert_at(review, Utc::now() + self.skew).await)
        }

        async fn get(&self, id: Uuid) -> Result<Option<Review>, AppError> {
            self.inner.get(id).await
        }

        async fn list(
            &self,
            filter: RatingFilter,
            offset: u64,
            limit: u32,
        ) -> Result<(Vec<Review>, u64), AppError> {
            self.inner.list(filter, offset, limit).await
        }

        async fn list_all(
            &self,
            filter: RatingFilter,
            max_rows: usize,
        ) -> Result<Vec<Review>, AppError> {
            self.inner.list_all(filter, max_rows).await
        }

        async fn rating_snapshot(&self) -> Result<RatingSnapshot, AppError> {
            let mut snapshot = self.inner.rating_snapshot().await?;
            snapshot.taken_at += self.skew;
            Ok(snapshot)
        }
    }

    fn sample(rating: i64, created_at: DateTime<Utc>) -> RatingSample {
        RatingSample {
            rating: Rating::new(rating).unwrap(),
            created_at,
        }
    }

    #[test]
    fn empty_snapshot_has_zero_average_and_all_keys() {
        let out = summarize_ratings(&[], Utc::now());
        assert_eq!(out.total_reviews, 0);
        assert_eq!(out.average_rating, 0.0);
        assert_eq!(out.rating_distribution.len(), 5);
        assert!(out.rating_distribution.values().all(|&c| c == 0));
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        let now = Utc::now();
        let samples = [sample(5, now), sample(4, now), sample(4, now)];
        let out = summarize_ratings(&samples, now);
        assert_eq!(out.average_rating, 4.33);
        assert_eq!(out.rating_distribution[&4], 2);
        assert_eq!(out.rating_distribution.values().sum::<u64>(), out.total_reviews);
    }

    #[test]
    fn recent_window_is_half_open() {
        let now = Utc::now();
        let samples = [
            sample(1, now - Duration::hours(24)),
            sample(2, now - Duration::hours(24) - Duration::seconds(1)),
            sample(3, now - Duration::minutes(30)),
            sample(4, now),
        ];
        let out = summarize_ratings(&samples, now);
        assert_eq!(out.recent_reviews_count, 2);
        assert_eq!(out.total_reviews, 4);
    }

    #[tokio::test]
    async fn recent_window_follows_store_clock() {
        let store = SkewedStore {
            inner: MemoryReviewStore::new(),
            skew: Duration::minutes(10),
        };
        store
            .insert(NewReview {
                rating: Rating::new(5).unwrap(),
                review_text: "Quick and friendly service".into(),
                summary: None,
                recommended_actions: None,
                user_response: "Thanks".into(),
            })
            .await
            .unwrap();

        let out = get_analytics(&store).await.unwrap();
        assert_eq!(out.total_reviews, 1);
        assert_eq!(out.recent_reviews_count, 1);
    }
}
