use crate::{
    errors::ValidationError,
    models::{Rating, ReviewSubmitRequest},
};

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: Option<String>,
    pub rating: Rating,
    pub review_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionRules {
    pub require_name: bool,
}

pub fn validate_submission(
    request: &ReviewSubmitRequest,
    rules: &SubmissionRules,
) -> Result<ValidSubmission, ValidationError> {
    let rating = parse_rating(&request.rating)?;

    let review_text = request.review_text.trim();
    let len = review_text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(ValidationError::TextTooShort {
            len,
            min: MIN_TEXT_CHARS,
        });
    }
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    if rules.require_name && name.is_none() {
        return Err(ValidationError::MissingName);
    }

    Ok(ValidSubmission {
        name,
        rating,
        review_text: review_text.to_string(),
    })
}

fn parse_rating(raw: &serde_json::Value) -> Result<Rating, ValidationError> {
    match raw.as_i64() {
        Some(value) => Rating::new(value),
        // 4.0 is accepted as 4, 4.5 is not
        None => match raw.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Rating::new(f as i64),
            _ => Err(ValidationError::InvalidRating(raw.to_string())),
        },
    }
}
