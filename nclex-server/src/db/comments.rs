//! Comment queries

use nclex_common::models::Comment;
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    review_id: i64,
    author: String,
    content: String,
    created_at: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            review_id: row.review_id,
            author: row.author,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// Comments on a review, oldest first
pub async fn list_comments(pool: &SqlitePool, review_id: i64) -> sqlx::Result<Vec<Comment>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT id, review_id, author, content, created_at
         FROM comments
         WHERE review_id = ?
         ORDER BY created_at ASC, id ASC",
    )
    .bind(review_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

/// Insert a comment, returning its id
pub async fn insert_comment(
    pool: &SqlitePool,
    review_id: i64,
    author: &str,
    content: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO comments (review_id, author, content) VALUES (?, ?, ?)")
        .bind(review_id)
        .bind(author)
        .bind(content)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_in_memory, reviews};
    use nclex_common::models::NewReview;

    #[tokio::test]
    async fn test_comments_in_insertion_order() {
        let pool = init_in_memory().await.unwrap();
        let review: NewReview = serde_json::from_value(serde_json::json!({
            "title": "t", "author": "a", "content": "c"
        }))
        .unwrap();
        let review_id = reviews::insert_review(&pool, &review).await.unwrap();

        let first = insert_comment(&pool, review_id, "kim", "congrats").await.unwrap();
        let second = insert_comment(&pool, review_id, "park", "thanks!").await.unwrap();

        let comments = list_comments(&pool, review_id).await.unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(comments[0].author, "kim");
        assert_eq!(comments[1].review_id, review_id);
    }

    #[tokio::test]
    async fn test_comment_requires_existing_review() {
        let pool = init_in_memory().await.unwrap();
        let result = insert_comment(&pool, 999, "kim", "orphan").await;
        assert!(result.is_err(), "Foreign key should reject orphan comment");
    }
}
