//! Wire ↔ canonical review conversion
//!
//! [`transform_review`] is total over any [`RawReview`]: the required identity
//! fields are already guaranteed by deserialization, and every optional field
//! falls back to a fixed default. It is also idempotent through
//! [`to_wire`]: `transform_review(to_wire(&r)) == r` for any `r` it produced.

use crate::models::{BaseInfo, EnglishLevel, PassStatus, RawReview, Review};

/// Experience assumed when the wire record omits it
pub const DEFAULT_EXPERIENCE: &str = "New Grad";

/// Convert a wire record into the canonical representation
pub fn transform_review(raw: RawReview) -> Review {
    Review {
        id: raw.id,
        title: raw.title,
        author: raw.author,
        pass_status: raw
            .pass_status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(PassStatus::Pass),
        exam_date: non_empty(raw.exam_date),
        study_period: raw.study_period.unwrap_or_default(),
        study_period_months: raw
            .study_period_months
            .map(|m| m.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(0),
        base_info: BaseInfo {
            experience: non_empty(raw.experience)
                .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string()),
            english_level: raw
                .english_level
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(EnglishLevel::Medium),
            is_working: raw.is_working,
        },
        resources: raw.resources.unwrap_or_default(),
        content: raw.content,
        center_tips: non_empty(raw.center_tips),
        view_count: raw.view_count.map(clamp_counter).unwrap_or(0),
        likes: raw.likes.map(clamp_counter).unwrap_or(0),
        created_at: raw
            .created_at
            .as_deref()
            .map(truncate_to_date)
            .unwrap_or_default(),
        is_verified: raw.is_verified,
    }
}

/// Convert a canonical record back into wire form
pub fn to_wire(review: &Review) -> RawReview {
    RawReview {
        id: review.id.clone(),
        title: review.title.clone(),
        author: review.author.clone(),
        content: review.content.clone(),
        pass_status: Some(review.pass_status.as_str().to_string()),
        exam_date: review.exam_date.clone(),
        study_period: Some(review.study_period.clone()),
        study_period_months: Some(review.study_period_months as i64),
        experience: Some(review.base_info.experience.clone()),
        english_level: Some(review.base_info.english_level.as_str().to_string()),
        is_working: review.base_info.is_working,
        resources: Some(review.resources.clone()),
        center_tips: review.center_tips.clone(),
        view_count: Some(review.view_count as i64),
        likes: Some(review.likes as i64),
        created_at: Some(review.created_at.clone()),
        is_verified: review.is_verified,
    }
}

/// Keep only the date portion of a timestamp.
///
/// Splits on the first `T` or space; a value without either is returned whole.
pub fn truncate_to_date(timestamp: &str) -> String {
    match timestamp.find(['T', ' ']) {
        Some(idx) => timestamp[..idx].to_string(),
        None => timestamp.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn clamp_counter(value: i64) -> u64 {
    value.max(0) as u64
}
