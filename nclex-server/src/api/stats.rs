//! Board statistics

use axum::{extract::State, Json};
use nclex_common::models::Stats;

use super::ApiError;
use crate::{db, AppState};

/// GET /api/stats
///
/// Total review count, pass rate percentage and average study months.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(db::reviews::stats(&state.db).await?))
}
