pub mod analytics;
pub mod auth;
pub mod export;
pub mod health;
pub mod review;

pub use analytics::get_analytics_handler;
pub use auth::{login_handler, logout_handler, session_handler};
pub use export::export_reviews_handler;
pub use health::health_handler;
pub use review::{
    get_priority_reviews_handler, get_review_handler, get_reviews_handler, submit_review_handler,
};
