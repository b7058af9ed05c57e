use async_trait::async_trait;

use super::{Classifier, Enrichment};
use crate::{models::Rating, validation::ValidSubmission};

const SUMMARY_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct TemplateClassifier;

#[async_trait]
impl Classifier for TemplateClassifier {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn classify(&self, input: &ValidSubmission) -> Enrichment {
        let urgent = input.rating.is_urgent();
        Enrichment {
            user_response: acknowledgement(input.rating).to_string(),
            summary: urgent.then(|| summarize(&input.review_text)),
            recommended_actions: urgent.then(|| actions(input.rating)),
        }
    }
}

pub fn acknowledgement(rating: Rating) -> &'static str {
    match rating.get() {
        5 => {
            "Thank you so much for your wonderful 5-star review! We're thrilled to hear about your positive experience."
        }
        4 => {
            "Thank you for your 4-star review! We appreciate your feedback and are glad you had a good experience."
        }
        3 => {
            "Thank you for your review. We appreciate your feedback and will work to improve your experience."
        }
        2 => {
            "Thank you for sharing your feedback. We're sorry your experience wasn't better and will work to address your concerns."
        }
        _ => {
            "We sincerely apologize for your experience. Your feedback is important to us and we will take immediate action to improve."
        }
    }
}

pub fn summarize(review_text: &str) -> String {
    let text = review_text.trim();
    if text.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        text.to_string()
    }
}

pub fn actions(rating: Rating) -> Vec<String> {
    let steps: &[&str] = match rating.get() {
        1 => &[
            "Urgent: Contact customer",
            "Escalate to management",
            "Conduct internal review",
        ],
        2 => &[
            "Contact customer immediately",
            "Investigate issues",
            "Offer compensation",
        ],
        _ => &["Review feedback", "Take appropriate action"],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
