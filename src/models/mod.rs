pub mod analytics;
pub mod auth;
pub mod review;

pub use analytics::{AnalyticsResponse, RatingSample, RatingSnapshot};
pub use auth::{Claims, LoginRequest, Session};
pub use review::{
    NewReview, Pagination, PriorityReviews, Rating, RatingFilter, Review, ReviewSubmitRequest,
    ReviewSubmitResponse, ReviewsPage,
};
