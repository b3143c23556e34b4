//! Review board data models
//!
//! Two representations of a review exist:
//! - [`RawReview`]: the wire format returned by the API (snake_case, optional fields)
//! - [`Review`]: the canonical client-side record with defaults applied
//!
//! Conversion between them lives in [`crate::transform`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Error;

/// Study resources offered by the submission form.
///
/// Stored resources are not restricted to this list.
pub const RESOURCE_OPTIONS: [&str; 7] = [
    "UWorld",
    "Archer",
    "Saunders",
    "Mark Klimek",
    "Princeton Review",
    "Kaplan",
    "SimpleNursing",
];

/// Experience options offered by the submission form
pub const EXPERIENCE_OPTIONS: [&str; 4] = ["New Grad", "1-2 Years", "3-5 Years", "5+ Years"];

/// Exam outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PassStatus {
    #[default]
    Pass,
    Fail,
}

impl PassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassStatus::Pass => "Pass",
            PassStatus::Fail => "Fail",
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pass" => Ok(PassStatus::Pass),
            "Fail" => Ok(PassStatus::Fail),
            other => Err(Error::InvalidInput(format!("Unknown pass status: {}", other))),
        }
    }
}

/// Self-reported English proficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnglishLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl EnglishLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnglishLevel::High => "High",
            EnglishLevel::Medium => "Medium",
            EnglishLevel::Low => "Low",
        }
    }
}

impl fmt::Display for EnglishLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnglishLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(EnglishLevel::High),
            "Medium" => Ok(EnglishLevel::Medium),
            "Low" => Ok(EnglishLevel::Low),
            other => Err(Error::InvalidInput(format!("Unknown English level: {}", other))),
        }
    }
}

/// Review record as it appears on the wire
///
/// Only `id`, `title`, `author` and `content` are required. Everything else may
/// be missing or null and is defaulted by [`crate::transform::transform_review`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    /// Server-assigned identifier (integer on the wire, kept opaque here)
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub pass_status: Option<String>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub study_period: Option<String>,
    #[serde(default)]
    pub study_period_months: Option<i64>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub english_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub is_working: bool,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
    #[serde(default)]
    pub center_tips: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub is_verified: bool,
}

/// Background of the reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseInfo {
    pub experience: String,
    pub english_level: EnglishLevel,
    pub is_working: bool,
}

/// Canonical review record used by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pass_status: PassStatus,
    pub exam_date: Option<String>,
    /// Human-readable duration, e.g. "3 months"
    pub study_period: String,
    /// Derived from `study_period` at submission time; used for filtering only
    pub study_period_months: u32,
    pub base_info: BaseInfo,
    pub resources: Vec<String>,
    pub content: String,
    pub center_tips: Option<String>,
    pub view_count: u64,
    pub likes: u64,
    /// Creation date truncated to day precision
    pub created_at: String,
    pub is_verified: bool,
}

/// GET /stats response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_reviews: i64,
    /// Percentage of reviews reporting a pass (0-100)
    pub pass_rate: f64,
    pub avg_study_months: f64,
}

impl Default for Stats {
    /// Placeholder shown before the first successful fetch
    fn default() -> Self {
        Self {
            total_reviews: 0,
            pass_rate: 0.0,
            avg_study_months: 4.0,
        }
    }
}

/// GET /reviews response, generic over the record representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage<T> {
    pub reviews: Vec<T>,
    pub total: i64,
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> ReviewPage<T> {
    /// Convert every record, keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ReviewPage<U> {
        ReviewPage {
            reviews: self.reviews.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// POST /reviews request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub pass_status: PassStatus,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub study_period: Option<String>,
    #[serde(default)]
    pub study_period_months: Option<u32>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub english_level: Option<EnglishLevel>,
    #[serde(default)]
    pub is_working: bool,
    #[serde(default)]
    pub resources: Vec<String>,
    pub content: String,
    #[serde(default)]
    pub center_tips: Option<String>,
}

/// Comment attached to a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub author: String,
    pub content: String,
    pub created_at: String,
}

/// GET /reviews/{id}/comments response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
}

/// POST /reviews/{id}/comments request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub author: String,
    pub content: String,
}

/// Response to any creating POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub id: i64,
    #[serde(default)]
    pub message: String,
}

/// POST /reviews/{id}/like response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    pub likes: i64,
}

/// Accept either a JSON string or number as an opaque identifier
fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Coerce any JSON value to a boolean by truthiness.
///
/// null, false, 0, NaN and "" are false; everything else is true.
/// SQLite-backed servers commonly send 0/1 instead of booleans.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
