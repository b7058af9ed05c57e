use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{Classifier, Enrichment, template};
use crate::{errors::AppError, validation::ValidSubmission};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_ACTIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_retries: 2,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn generate(&self, prompt: &str) -> Option<String> {
        let mut attempt = 0;
        loop {
            match self.call_model(prompt).await {
                Ok(text) => return Some(text),
                Err(e) => {
                    tracing::error!("Model call failed (attempt {}): {}", attempt + 1, e);
                    if attempt >= self.max_retries {
                        return None;
                    }
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    async fn call_model(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let res = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach model: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Model returned status {}",
                res.status()
            )));
        }

        let body: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Invalid model response: {}", e)))?;

        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Upstream("Model response had no text".into()))
    }

    async fn user_response(&self, input: &ValidSubmission) -> String {
        let customer = input
            .name
            .as_deref()
            .map(|n| format!("A customer named {n}"))
            .unwrap_or_else(|| "A customer".to_string());
        let prompt = format!(
            "You are a customer service representative. {customer} has left a {rating}-star review.\n\n\
             Review: \"{text}\"\n\n\
             Generate a warm, professional, and personalized response (2-3 sentences) that:\n\
             1. Addresses them by name if known\n\
             2. Thanks them for their feedback\n\
             3. Addresses their specific points\n\
             4. Is appropriate for a {rating}-star rating\n\n\
             Response:",
            rating = input.rating,
            text = input.review_text,
        );

        self.generate(&prompt).await.unwrap_or_else(|| {
            tracing::warn!("Falling back to template acknowledgement");
            template::acknowledgement(input.rating).to_string()
        })
    }

    async fn summary(&self, input: &ValidSubmission) -> String {
        let prompt = format!(
            "Summarize this customer review in one concise sentence (max 15 words):\n\n\
             Review: \"{}\"\n\nSummary:",
            input.review_text
        );

        self.generate(&prompt).await.unwrap_or_else(|| {
            tracing::warn!("Falling back to truncated summary");
            template::summarize(&input.review_text)
        })
    }

    async fn recommended_actions(&self, input: &ValidSubmission) -> Vec<String> {
        let prompt = format!(
            "Based on this {}-star review, suggest 2-3 specific, actionable next steps for the business.\n\n\
             Review: \"{}\"\n\n\
             Provide ONLY the action items as a numbered list:",
            input.rating, input.review_text
        );

        let parsed = self
            .generate(&prompt)
            .await
            .map(|text| parse_action_list(&text))
            .unwrap_or_default();

        if parsed.is_empty() {
            tracing::warn!("Falling back to template actions");
            template::actions(input.rating)
        } else {
            parsed
        }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn classify(&self, input: &ValidSubmission) -> Enrichment {
        if !input.rating.is_urgent() {
            return Enrichment {
                user_response: self.user_response(input).await,
                summary: None,
                recommended_actions: None,
            };
        }

        let (user_response, summary, actions) = tokio::join!(
            self.user_response(input),
            self.summary(input),
            self.recommended_actions(input)
        );

        Enrichment {
            user_response,
            summary: Some(summary),
            recommended_actions: Some(actions),
        }
    }
}

/// Pulls list items out of a numbered or bulleted model answer.
pub fn parse_action_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with(|c: char| c.is_ascii_digit())
                || line.starts_with('-')
                || line.starts_with('•')
        })
        .map(|line| {
            line.trim_start_matches(|c: char| {
                c.is_ascii_digit() || matches!(c, '.' | '-' | '•' | ')' | ' ')
            })
            .replace("**", "")
            .replace("__", "")
            .replace(['*', '_'], "")
            .trim()
            .to_string()
        })
        .filter(|action| !action.is_empty())
        .take(MAX_ACTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_list_with_markdown() {
        let text = "Here are some steps:\n\
                    1. **Call the customer** within 24 hours\n\
                    2) Refund the delivery fee\n\
                    - Audit the courier_partner contract\n\
                    4. Extra step that gets dropped";
        assert_eq!(
            parse_action_list(text),
            vec![
                "Call the customer within 24 hours",
                "Refund the delivery fee",
                "Audit the courierpartner contract",
            ]
        );
    }

    #[test]
    fn ignores_prose_without_list_markers() {
        assert!(parse_action_list("Just apologise to them.").is_empty());
        assert!(parse_action_list("1. \n- ").is_empty());
    }
}
