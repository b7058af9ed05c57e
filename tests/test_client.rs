use std::{net::SocketAddr, sync::Arc};

use review_desk_be::{
    build_router,
    client::{ReviewApiClient, SubmitReview},
    config::Config,
    db::MemoryReviewStore,
    errors::AppError,
    models::Rating,
    state::AppState,
    triage::TemplateClassifier,
};
use uuid::Uuid;

/// Serves a fresh in-memory app on an ephemeral port.
async fn spawn_server() -> ReviewApiClient {
    let state = AppState::new(
        Arc::new(MemoryReviewStore::new()),
        Arc::new(TemplateClassifier),
        Config::default(),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    ReviewApiClient::new(format!("http://{addr}/"))
}

#[tokio::test]
async fn test_client_round_trip() {
    let client = spawn_server().await;
    assert!(!client.base_url().ends_with('/'));

    let submitted = client
        .submit_review(&SubmitReview {
            name: Some("Ann"),
            rating: 1,
            review_text: "This was a terrible experience overall.",
        })
        .await
        .unwrap();
    assert_eq!(submitted.status, "submitted");
    assert!(!submitted.user_response.is_empty());

    client
        .submit_review(&SubmitReview {
            name: None,
            rating: 4,
            review_text: "Good value for the money.",
        })
        .await
        .unwrap();

    let page = client.get_reviews(1, 20, None).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.reviews[0].rating.get(), 4);

    let filtered = client
        .get_reviews(1, 20, Some(Rating::new(1).unwrap()))
        .await
        .unwrap();
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.reviews[0].id, submitted.id);

    let priority = client.get_priority_reviews(20).await.unwrap();
    assert_eq!(priority.total_urgent, 1);
    assert!(
        priority.urgent_reviews[0]
            .recommended_actions
            .as_ref()
            .is_some_and(|a| !a.is_empty())
    );

    let analytics = client.get_analytics().await.unwrap();
    assert_eq!(analytics.total_reviews, 2);
    assert_eq!(analytics.rating_distribution[&1], 1);
    assert_eq!(analytics.rating_distribution[&4], 1);
    assert_eq!(analytics.average_rating, 2.5);

    let single = client.get_review(submitted.id).await.unwrap();
    assert_eq!(single.review_text, "This was a terrible experience overall.");

    let csv = client
        .export_reviews(Some(Rating::new(4).unwrap()))
        .await
        .unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Good value for the money."));
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let client = spawn_server().await;

    let err = client
        .submit_review(&SubmitReview {
            name: None,
            rating: 9,
            review_text: "Rating is out of range here.",
        })
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("Rating must be")),
        other => panic!("unexpected error: {other}"),
    }

    let err = client.get_review(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
