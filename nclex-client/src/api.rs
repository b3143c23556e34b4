//! Review API abstraction
//!
//! The session drives everything through this trait so it can run against the
//! real HTTP client or an in-process double.

use async_trait::async_trait;
use nclex_common::models::{
    Comment, Created, LikeCount, NewComment, NewReview, Review, ReviewPage, Stats,
};
use nclex_common::ReviewQuery;

use crate::ClientError;

/// Operations offered by the review API
///
/// Records are returned in canonical form; implementations apply
/// [`nclex_common::transform_review`] to wire records.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// GET /stats
    async fn fetch_stats(&self) -> Result<Stats, ClientError>;

    /// GET /reviews with only the constrained query fields
    async fn fetch_reviews(&self, query: &ReviewQuery) -> Result<ReviewPage<Review>, ClientError>;

    /// GET /reviews/{id}
    async fn fetch_review(&self, id: &str) -> Result<Review, ClientError>;

    /// POST /reviews
    async fn create_review(&self, review: &NewReview) -> Result<Created, ClientError>;

    /// POST /reviews/{id}/like
    async fn like_review(&self, id: &str) -> Result<LikeCount, ClientError>;

    /// GET /reviews/{id}/comments
    async fn fetch_comments(&self, review_id: &str) -> Result<Vec<Comment>, ClientError>;

    /// POST /reviews/{id}/comments
    async fn create_comment(
        &self,
        review_id: &str,
        comment: &NewComment,
    ) -> Result<Created, ClientError>;
}
