use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const ALL: [Rating; 5] = [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)];

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (MIN_RATING as i64..=MAX_RATING as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(ValidationError::InvalidRating(value.to_string()))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_urgent(self) -> bool {
        self.0 <= 2
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub rating: Rating,
    pub review_text: String,
    pub summary: Option<String>,
    pub recommended_actions: Option<Vec<String>>,
    pub user_response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: Rating,
    pub review_text: String,
    pub summary: Option<String>,
    pub recommended_actions: Option<Vec<String>>,
    pub user_response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSubmitRequest {
    #[serde(default)]
    pub name: Option<String>,
    // loose so non-integer ratings surface as InvalidRating
    #[serde(default)]
    pub rating: serde_json::Value,
    #[serde(default)]
    pub review_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmitResponse {
    pub id: Uuid,
    pub rating: Rating,
    pub review_text: String,
    pub user_response: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

impl From<Review> for ReviewSubmitResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            review_text: review.review_text,
            user_response: review.user_response,
            created_at: review.created_at,
            status: "submitted".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsPage {
    pub reviews: Vec<Review>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityReviews {
    pub urgent_reviews: Vec<Review>,
    pub total_urgent: u64,
    pub message: String,
}

impl PriorityReviews {
    pub fn new(urgent_reviews: Vec<Review>, total_urgent: u64) -> Self {
        Self {
            urgent_reviews,
            total_urgent,
            message: format!("Found {total_urgent} reviews requiring immediate attention"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingFilter {
    #[default]
    Any,
    Exactly(Rating),
    Urgent,
}

impl RatingFilter {
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|v| Rating::new(v).ok())
            .map(RatingFilter::Exactly)
            .unwrap_or(RatingFilter::Any)
    }

    pub fn matches(self, rating: Rating) -> bool {
        match self {
            RatingFilter::Any => true,
            RatingFilter::Exactly(r) => r == rating,
            RatingFilter::Urgent => rating.is_urgent(),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PRIORITY_LIMIT: u32 = 20;
pub const MAX_PRIORITY_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => s.min(MAX_PAGE_SIZE as i64) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

pub fn priority_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(l) if l >= 1 => l.min(MAX_PRIORITY_LIMIT as i64) as u32,
        _ => DEFAULT_PRIORITY_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
        assert_eq!(Rating::new(4).unwrap().get(), 4);
    }

    #[test]
    fn pagination_clamps_and_defaults() {
        assert_eq!(
            Pagination::from_params(None, None),
            Pagination { page: 1, page_size: 50 }
        );
        assert_eq!(Pagination::from_params(Some(2), Some(500)).page_size, 100);
        assert_eq!(Pagination::from_params(Some(0), Some(0)).page_size, 50);
        assert_eq!(Pagination::from_params(Some(-1), Some(-20)).page, 1);
        assert_eq!(Pagination::from_params(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn rating_filter_ignores_garbage() {
        assert_eq!(RatingFilter::from_param(Some("9")), RatingFilter::Any);
        assert_eq!(RatingFilter::from_param(Some("abc")), RatingFilter::Any);
        assert_eq!(
            RatingFilter::from_param(Some("3")),
            RatingFilter::Exactly(Rating::new(3).unwrap())
        );
    }

    #[test]
    fn priority_limit_clamps() {
        assert_eq!(priority_limit(None), 20);
        assert_eq!(priority_limit(Some(250)), 100);
        assert_eq!(priority_limit(Some(0)), 20);
        assert_eq!(priority_limit(Some(5)), 5);
    }
}
