use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::Rating;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub total_reviews: u64,
    pub average_rating: f64,
    pub rating_distribution: BTreeMap<u8, u64>,
    pub recent_reviews_count: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RatingSample {
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
}

// taken_at is read from the same clock that stamps created_at
#[derive(Debug, Clone)]
pub struct RatingSnapshot {
    pub samples: Vec<RatingSample>,
    pub taken_at: DateTime<Utc>,
}
