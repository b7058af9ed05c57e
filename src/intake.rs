use crate::{
    db::ReviewStore,
    errors::AppError,
    models::{NewReview, Review, ReviewSubmitRequest},
    triage::Classifier,
    validation::{SubmissionRules, validate_submission},
};

pub async fn submit_review(
    request: &ReviewSubmitRequest,
    rules: &SubmissionRules,
    classifier: &dyn Classifier,
    store: &dyn ReviewStore,
) -> Result<Review, AppError> {
    let submission = validate_submission(request, rules)?;

    tracing::info!(
        "Received review submission: rating={} classifier={}",
        submission.rating,
        classifier.name()
    );

    let enrichment = classifier.classify(&submission).await.settle(&submission);

    let review = store
        .insert(NewReview {
            rating: submission.rating,
            review_text: submission.review_text,
            summary: enrichment.summary,
            recommended_actions: enrichment.recommended_actions,
            user_response: enrichment.user_response,
        })
        .await?;

    tracing::info!("Review saved successfully: id={}", review.id);

    Ok(review)
}
