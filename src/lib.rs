pub mod analytics;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod http;
pub mod intake;
pub mod middleware;
pub mod models;
pub mod state;
pub mod triage;
pub mod validation;

use axum::{Json, Router, http::StatusCode, middleware as axum_middleware};
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Config, StoreBackend},
    db::{MemoryReviewStore, PgReviewStore, ReviewStore, init::initialize_schema},
    errors::{AppError, ErrorResponse},
    state::AppState,
    triage::{Classifier, GeminiClassifier, TemplateClassifier},
};

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.port;
    let state = build_state(config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {port}: {e}")))?;

    tracing::info!("Review Desk API running at http://0.0.0.0:{port}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}

pub async fn build_state(config: Config) -> Result<AppState, AppError> {
    let store: Arc<dyn ReviewStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| AppError::EnvError("DATABASE_URL must be set".into()))?;
            let postgres = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;
            initialize_schema(&postgres).await?;
            tracing::info!("Using Postgres review store");
            Arc::new(PgReviewStore::new(postgres))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory review store; reviews are lost on restart");
            Arc::new(MemoryReviewStore::new())
        }
    };

    let classifier: Arc<dyn Classifier> = match config.gemini_api_key.as_deref() {
        Some(key) => Arc::new(GeminiClassifier::new(key, config.gemini_model.clone())),
        None => Arc::new(TemplateClassifier),
    };
    tracing::info!("Using {} classifier", classifier.name());

    Ok(AppState::new(store, classifier, config))
}

pub fn build_router(state: AppState) -> Router {
    let rate_limiter = create_rate_limiter(state.config.rate_limit_per_minute);

    Router::new()
        .merge(http::create_http_routes(state))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Not found".into(),
                    detail: None,
                }),
            )
        })
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
