//! Review comments

use axum::{
    extract::{Path, State},
    Json,
};
use nclex_common::models::{CommentList, Created, NewComment};
use tracing::info;

use super::error::require_text;
use super::ApiError;
use crate::{db, AppState};

/// GET /api/reviews/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
) -> Result<Json<CommentList>, ApiError> {
    if !db::reviews::review_exists(&state.db, review_id).await? {
        return Err(ApiError::NotFound(format!("Review {}", review_id)));
    }

    let comments = db::comments::list_comments(&state.db, review_id).await?;
    Ok(Json(CommentList { comments }))
}

/// POST /api/reviews/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Json(comment): Json<NewComment>,
) -> Result<Json<Created>, ApiError> {
    if !db::reviews::review_exists(&state.db, review_id).await? {
        return Err(ApiError::NotFound(format!("Review {}", review_id)));
    }
    require_text("author", &comment.author)?;
    require_text("content", &comment.content)?;

    let id = db::comments::insert_comment(
        &state.db,
        review_id,
        comment.author.trim(),
        &comment.content,
    )
    .await?;
    info!(review_id, comment_id = id, "Comment created");

    Ok(Json(Created {
        id,
        message: "Comment created successfully".to_string(),
    }))
}
