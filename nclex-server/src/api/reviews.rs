//! Review listing, detail, submission and likes

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use nclex_common::models::{Created, LikeCount, NewReview, ReviewPage};
use nclex_common::parse_months;
use nclex_common::query::ALL;
use serde::Deserialize;
use tracing::{debug, info};

use super::error::require_text;
use super::ApiError;
use crate::db::reviews::{ReviewFilter, ReviewRecord};
use crate::pagination::calculate_pagination;
use crate::{db, AppState};

/// Query parameters for the review list
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
    pub per_page: Option<i64>,
    #[serde(default)]
    pub search: String,
    /// `yes` or `no`; anything else is ignored
    pub is_working: Option<String>,
    pub english_level: Option<String>,
    pub resource: Option<String>,
}

fn default_page() -> i64 {
    1
}

impl ListParams {
    fn to_filter(&self) -> ReviewFilter {
        let is_working = match self.is_working.as_deref() {
            Some("yes") => Some(true),
            Some("no") => Some(false),
            _ => None,
        };

        ReviewFilter {
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            is_working,
            english_level: constrained(&self.english_level).map(str::to_string),
            resource: constrained(&self.resource).map(str::to_string),
        }
    }
}

fn constrained(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != ALL)
}

/// GET /api/reviews
///
/// Filtered, paginated list, newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ReviewPage<ReviewRecord>>, ApiError> {
    if params.page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }

    let per_page = params.per_page.unwrap_or(state.paging.default_per_page);
    if per_page < 1 || per_page > state.paging.max_per_page {
        return Err(ApiError::BadRequest(format!(
            "per_page must be between 1 and {}",
            state.paging.max_per_page
        )));
    }

    let filter = params.to_filter();
    let total = db::reviews::count_reviews(&state.db, &filter).await?;
    let p = calculate_pagination(total, params.page, per_page)
        .ok_or_else(|| ApiError::BadRequest(format!("page {} is out of range", params.page)))?;
    let reviews = db::reviews::list_reviews(&state.db, &filter, p.per_page, p.offset).await?;

    debug!(total, page = p.page, returned = reviews.len(), "Listed reviews");

    Ok(Json(ReviewPage {
        reviews,
        total,
        page: p.page,
        per_page: p.per_page,
        total_pages: p.total_pages,
    }))
}

/// GET /api/reviews/:id
///
/// Counts one view per distinct client address before returning the review.
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<Json<ReviewRecord>, ApiError> {
    if !db::reviews::review_exists(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Review {}", id)));
    }

    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    if db::views::record_view(&state.db, id, &ip).await? {
        debug!(review_id = id, ip = %ip, "Counted new view");
    }

    let review = db::reviews::get_review(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Review {}", id)))?;

    Ok(Json(review))
}

/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(review): Json<NewReview>,
) -> Result<Json<Created>, ApiError> {
    let review = normalize_new_review(review)?;
    let id = db::reviews::insert_review(&state.db, &review).await?;

    info!(review_id = id, author = %review.author, "Review created");

    Ok(Json(Created {
        id,
        message: "Review created successfully".to_string(),
    }))
}

/// POST /api/reviews/:id/like
pub async fn like_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeCount>, ApiError> {
    let likes = db::reviews::increment_likes(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Review {}", id)))?;

    Ok(Json(LikeCount { likes }))
}

/// Validate a submission and fill derived fields
///
/// Blank optional strings are stored as NULL. A missing month count is
/// derived from the study period text.
fn normalize_new_review(mut review: NewReview) -> Result<NewReview, ApiError> {
    require_text("title", &review.title)?;
    require_text("author", &review.author)?;
    require_text("content", &review.content)?;

    review.title = review.title.trim().to_string();
    review.author = review.author.trim().to_string();

    review.exam_date = blank_to_none(review.exam_date);
    if let Some(date) = &review.exam_date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ApiError::BadRequest(format!("exam_date must be YYYY-MM-DD, got {}", date))
        })?;
    }

    review.study_period = blank_to_none(review.study_period);
    if review.study_period_months.is_none() {
        review.study_period_months = review.study_period.as_deref().map(parse_months);
    }

    review.experience = blank_to_none(review.experience);
    review.center_tips = blank_to_none(review.center_tips);

    Ok(review)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Client address for view counting
///
/// Prefers the first `X-Forwarded-For` entry, then the peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}
