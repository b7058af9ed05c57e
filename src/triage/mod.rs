pub mod gemini;
pub mod template;

use async_trait::async_trait;

use crate::validation::ValidSubmission;

pub use gemini::GeminiClassifier;
pub use template::TemplateClassifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub user_response: String,
    pub summary: Option<String>,
    pub recommended_actions: Option<Vec<String>>,
}

impl Enrichment {
    /// Applies the band policy, filling any hole with the template output.
    pub fn settle(self, input: &ValidSubmission) -> Enrichment {
        let user_response = match self.user_response.trim() {
            "" => template::acknowledgement(input.rating).to_string(),
            text => text.to_string(),
        };

        if !input.rating.is_urgent() {
            return Enrichment {
                user_response,
                summary: None,
                recommended_actions: None,
            };
        }

        let summary = self
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| template::summarize(&input.review_text));

        let recommended_actions = self
            .recommended_actions
            .map(|actions| {
                actions
                    .into_iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|actions| !actions.is_empty())
            .unwrap_or_else(|| template::actions(input.rating));

        Enrichment {
            user_response,
            summary: Some(summary),
            recommended_actions: Some(recommended_actions),
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, input: &ValidSubmission) -> Enrichment;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn submission(rating: i64) -> ValidSubmission {
        ValidSubmission {
            name: None,
            rating: Rating::new(rating).unwrap(),
            review_text: "The delivery was late and the box was crushed.".into(),
        }
    }

    #[test]
    fn settle_strips_enrichment_outside_urgent_band() {
        let raw = Enrichment {
            user_response: "Thanks!".into(),
            summary: Some("late delivery".into()),
            recommended_actions: Some(vec!["Call them".into()]),
        };
        for rating in 3..=5 {
            let settled = raw.clone().settle(&submission(rating));
            assert_eq!(settled.summary, None);
            assert_eq!(settled.recommended_actions, None);
            assert_eq!(settled.user_response, "Thanks!");
        }
    }

    #[test]
    fn settle_fills_empty_fields_for_urgent_band() {
        let raw = Enrichment {
            user_response: "  ".into(),
            summary: Some("".into()),
            recommended_actions: Some(vec!["   ".into()]),
        };
        let settled = raw.settle(&submission(1));
        assert!(!settled.user_response.is_empty());
        assert!(settled.summary.is_some_and(|s| !s.is_empty()));
        assert!(settled.recommended_actions.is_some_and(|a| !a.is_empty()));
    }
}
