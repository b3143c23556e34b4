//! HTTP API handlers for nclex-server

pub mod comments;
pub mod error;
pub mod health;
pub mod reviews;
pub mod stats;

pub use comments::{create_comment, list_comments};
pub use error::ApiError;
pub use health::health_routes;
pub use reviews::{create_review, get_review, like_review, list_reviews};
pub use stats::get_stats;
