//! Review queries

use nclex_common::models::{NewReview, Stats};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Stored list separator for `resources`
const RESOURCE_SEPARATOR: char = ',';

/// Average reported when no review carries a month count
const DEFAULT_AVG_STUDY_MONTHS: f64 = 4.0;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    title: String,
    author: String,
    pass_status: String,
    exam_date: Option<String>,
    study_period: Option<String>,
    study_period_months: Option<i64>,
    experience: Option<String>,
    english_level: Option<String>,
    is_working: i64,
    resources: Option<String>,
    content: String,
    center_tips: Option<String>,
    view_count: i64,
    likes: i64,
    is_verified: i64,
    created_at: String,
}

/// Review as served on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub pass_status: String,
    pub exam_date: Option<String>,
    pub study_period: Option<String>,
    pub study_period_months: Option<i64>,
    pub experience: Option<String>,
    pub english_level: Option<String>,
    pub is_working: bool,
    pub resources: Vec<String>,
    pub content: String,
    pub center_tips: Option<String>,
    pub view_count: i64,
    pub likes: i64,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            pass_status: row.pass_status,
            exam_date: row.exam_date,
            study_period: row.study_period,
            study_period_months: row.study_period_months,
            experience: row.experience,
            english_level: row.english_level,
            is_working: row.is_working != 0,
            resources: split_resources(row.resources.as_deref()),
            content: row.content,
            center_tips: row.center_tips,
            view_count: row.view_count,
            likes: row.likes,
            is_verified: row.is_verified != 0,
            created_at: row.created_at,
        }
    }
}

/// Server-side list constraints; `None` means unconstrained
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub search: Option<String>,
    pub is_working: Option<bool>,
    /// Matched exactly; an unknown level matches nothing
    pub english_level: Option<String>,
    pub resource: Option<String>,
}

fn push_conditions(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ReviewFilter) {
    qb.push(" WHERE 1=1");

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR content LIKE ")
            .push_bind(pattern.clone())
            .push(" OR author LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(is_working) = filter.is_working {
        qb.push(" AND is_working = ").push_bind(is_working);
    }

    if let Some(level) = &filter.english_level {
        qb.push(" AND english_level = ").push_bind(level.clone());
    }

    if let Some(resource) = &filter.resource {
        qb.push(" AND resources LIKE ")
            .push_bind(format!("%{}%", resource));
    }
}

/// Count reviews matching the filter
pub async fn count_reviews(pool: &SqlitePool, filter: &ReviewFilter) -> sqlx::Result<i64> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM reviews");
    push_conditions(&mut qb, filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Page of reviews matching the filter, newest first
pub async fn list_reviews(
    pool: &SqlitePool,
    filter: &ReviewFilter,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<ReviewRecord>> {
    let mut qb = QueryBuilder::new("SELECT * FROM reviews");
    push_conditions(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = qb.build_query_as::<ReviewRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(ReviewRecord::from).collect())
}

/// Fetch a single review
pub async fn get_review(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<ReviewRecord>> {
    let row = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ReviewRecord::from))
}

/// Whether a review exists
pub async fn review_exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Insert a validated review, returning its id
///
/// New reviews start with zero views and likes and are unverified.
pub async fn insert_review(pool: &SqlitePool, review: &NewReview) -> sqlx::Result<i64> {
    let resources = join_resources(&review.resources);

    let result = sqlx::query(
        r#"
        INSERT INTO reviews (
            title, author, pass_status, exam_date, study_period, study_period_months,
            experience, english_level, is_working, resources, content, center_tips
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&review.title)
    .bind(&review.author)
    .bind(review.pass_status.as_str())
    .bind(&review.exam_date)
    .bind(&review.study_period)
    .bind(review.study_period_months.map(i64::from))
    .bind(&review.experience)
    .bind(review.english_level.map(|l| l.as_str()))
    .bind(review.is_working)
    .bind(resources)
    .bind(&review.content)
    .bind(&review.center_tips)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Increment the like counter, returning the new total (None if missing)
pub async fn increment_likes(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar("UPDATE reviews SET likes = likes + 1 WHERE id = ? RETURNING likes")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Aggregate board statistics
pub async fn stats(pool: &SqlitePool) -> sqlx::Result<Stats> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;

    let passed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE pass_status = 'Pass'")
        .fetch_one(pool)
        .await?;

    let avg_months: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(study_period_months) FROM reviews WHERE study_period_months IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;

    let pass_rate = if total > 0 {
        (passed as f64 / total as f64 * 100.0).round()
    } else {
        0.0
    };

    Ok(Stats {
        total_reviews: total,
        pass_rate,
        avg_study_months: avg_months
            .map(f64::round)
            .unwrap_or(DEFAULT_AVG_STUDY_MONTHS),
    })
}

fn join_resources(resources: &[String]) -> Option<String> {
    let joined = resources
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(&RESOURCE_SEPARATOR.to_string());

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn split_resources(stored: Option<&str>) -> Vec<String> {
    match stored {
        Some(s) if !s.is_empty() => s.split(RESOURCE_SEPARATOR).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
