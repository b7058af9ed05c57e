use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        export_reviews_handler, get_analytics_handler, get_priority_reviews_handler,
        get_review_handler, get_reviews_handler, health_handler, login_handler, logout_handler,
        session_handler, submit_review_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route(
            "/api/reviews",
            post(submit_review_handler).get(get_reviews_handler),
        )
        .route("/api/reviews/priority", get(get_priority_reviews_handler))
        .route("/api/reviews/export", get(export_reviews_handler))
        .route("/api/reviews/{id}", get(get_review_handler))
        .route("/api/analytics", get(get_analytics_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/session", get(session_handler))
        .route("/api/auth/logout", post(logout_handler))
        .with_state(state)
}
