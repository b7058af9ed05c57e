use axum::Json;
use serde_json::{Value, json};

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Review Desk API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
