//! Per-address view counting
//!
//! A review's `view_count` grows by one per distinct client address; repeat
//! visits from the same address are not counted.

use sqlx::SqlitePool;

/// Record a view, returning true when it was the first from this address
pub async fn record_view(pool: &SqlitePool, review_id: i64, ip_address: &str) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO view_logs (review_id, ip_address) VALUES (?, ?)",
    )
    .bind(review_id)
    .bind(ip_address)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("UPDATE reviews SET view_count = view_count + 1 WHERE id = ?")
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_in_memory, reviews};
    use nclex_common::models::NewReview;

    async fn seed(pool: &SqlitePool) -> i64 {
        let review: NewReview = serde_json::from_value(serde_json::json!({
            "title": "t", "author": "a", "content": "c"
        }))
        .unwrap();
        reviews::insert_review(pool, &review).await.unwrap()
    }

    #[tokio::test]
    async fn test_view_counted_once_per_address() {
        let pool = init_in_memory().await.unwrap();
        let id = seed(&pool).await;

        assert!(record_view(&pool, id, "10.0.0.1").await.unwrap());
        assert!(!record_view(&pool, id, "10.0.0.1").await.unwrap());
        assert!(record_view(&pool, id, "10.0.0.2").await.unwrap());

        let review = reviews::get_review(&pool, id).await.unwrap().unwrap();
        assert_eq!(review.view_count, 2);
    }
}
