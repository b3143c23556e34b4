//! # NCLEX Hub Common Library
//!
//! Shared code for the review board server and client including:
//! - Canonical and wire review models
//! - Wire-to-canonical transformation
//! - Filter state and query building
//! - Study period parsing
//! - Configuration loading

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod study_period;
pub mod transform;

pub use error::{Error, Result};
pub use models::{BaseInfo, EnglishLevel, PassStatus, RawReview, Review};
pub use query::{FilterState, ReviewQuery};
pub use study_period::parse_months;
pub use transform::transform_review;
