//! HTTP implementation of [`ReviewApi`]

use std::time::Duration;

use async_trait::async_trait;
use nclex_common::config::ClientConfig;
use nclex_common::models::{
    Comment, CommentList, Created, LikeCount, NewComment, NewReview, RawReview, Review,
    ReviewPage, Stats,
};
use nclex_common::{transform_review, ReviewQuery};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{ClientError, ReviewApi};

const USER_AGENT: &str = concat!("nclex-client/", env!("CARGO_PKG_VERSION"));

/// Review API client over reqwest
#[derive(Debug, Clone)]
pub struct HttpReviewApi {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpReviewApi {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8000/api`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_base, Duration::from_secs(config.timeout_secs))
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(url = %url, "GET");
        let response = self.http_client.get(url).send().await?;
        read_json(response).await
    }
}

/// Decode a success response, mapping any other status to an error
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ClientError::Status(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::Parse(e.to_string()))
}

#[async_trait]
impl ReviewApi for HttpReviewApi {
    async fn fetch_stats(&self) -> Result<Stats, ClientError> {
        self.get(self.endpoint(&["stats"])?).await
    }

    async fn fetch_reviews(&self, query: &ReviewQuery) -> Result<ReviewPage<Review>, ClientError> {
        let url = self.endpoint(&["reviews"])?;
        debug!(url = %url, ?query, "GET");

        let response = self.http_client.get(url).query(query).send().await?;
        let page: ReviewPage<RawReview> = read_json(response).await?;
        Ok(page.map(transform_review))
    }

    async fn fetch_review(&self, id: &str) -> Result<Review, ClientError> {
        let raw: RawReview = self.get(self.endpoint(&["reviews", id])?).await?;
        Ok(transform_review(raw))
    }

    async fn create_review(&self, review: &NewReview) -> Result<Created, ClientError> {
        let url = self.endpoint(&["reviews"])?;
        debug!(url = %url, title = %review.title, "POST");

        let response = self.http_client.post(url).json(review).send().await?;
        read_json(response).await
    }

    async fn like_review(&self, id: &str) -> Result<LikeCount, ClientError> {
        let url = self.endpoint(&["reviews", id, "like"])?;
        let response = self.http_client.post(url).send().await?;
        read_json(response).await
    }

    async fn fetch_comments(&self, review_id: &str) -> Result<Vec<Comment>, ClientError> {
        let list: CommentList = self
            .get(self.endpoint(&["reviews", review_id, "comments"])?)
            .await?;
        Ok(list.comments)
    }

    async fn create_comment(
        &self,
        review_id: &str,
        comment: &NewComment,
    ) -> Result<Created, ClientError> {
        let url = self.endpoint(&["reviews", review_id, "comments"])?;
        let response = self.http_client.post(url).json(comment).send().await?;
        read_json(response).await
    }
}
