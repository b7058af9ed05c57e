use reqwest::{Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    errors::{AppError, ErrorResponse},
    models::{
        AnalyticsResponse, PriorityReviews, Rating, Review, ReviewSubmitResponse, ReviewsPage,
    },
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReview<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub rating: u8,
    pub review_text: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReviewApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReviewApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("REVIEW_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit_review(
        &self,
        review: &SubmitReview<'_>,
    ) -> Result<ReviewSubmitResponse, AppError> {
        let res = self
            .http
            .post(self.url("/api/reviews"))
            .json(review)
            .send()
            .await
            .map_err(transport_error)?;
        json_body(res).await
    }

    pub async fn get_reviews(
        &self,
        page: u32,
        page_size: u32,
        rating: Option<Rating>,
    ) -> Result<ReviewsPage, AppError> {
        let mut params = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(rating) = rating {
            params.push(("rating", rating.to_string()));
        }

        let res = self
            .http
            .get(self.url("/api/reviews"))
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;
        json_body(res).await
    }

    pub async fn get_review(&self, id: Uuid) -> Result<Review, AppError> {
        let res = self
            .http
            .get(self.url(&format!("/api/reviews/{id}")))
            .send()
            .await
            .map_err(transport_error)?;
        json_body(res).await
    }

    pub async fn get_analytics(&self) -> Result<AnalyticsResponse, AppError> {
        let res = self
            .http
            .get(self.url("/api/analytics"))
            .send()
            .await
            .map_err(transport_error)?;
        json_body(res).await
    }

    pub async fn get_priority_reviews(&self, limit: u32) -> Result<PriorityReviews, AppError> {
        let res = self
            .http
            .get(self.url("/api/reviews/priority"))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(transport_error)?;
        json_body(res).await
    }

    pub async fn export_reviews(&self, rating: Option<Rating>) -> Result<Vec<u8>, AppError> {
        let mut req = self.http.get(self.url("/api/reviews/export"));
        if let Some(rating) = rating {
            req = req.query(&[("rating", rating.get())]);
        }

        let res = check_status(req.send().await.map_err(transport_error)?).await?;
        let bytes = res.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::Upstream(format!("Request failed: {}", e))
}

async fn json_body<T: DeserializeOwned>(res: Response) -> Result<T, AppError> {
    check_status(res)
        .await?
        .json::<T>()
        .await
        .map_err(|e| AppError::Serialization(format!("Invalid response body: {}", e)))
}

async fn check_status(res: Response) -> Result<Response, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.detail.unwrap_or(body.error))
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    Err(match status {
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            AppError::BadRequest(message)
        }
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Upstream(message),
    })
}
