//! Handlers for the dashboard aggregates.
//!
//! The summary is recomputed from the current project rows on every read
//! and never cached. Department callers see only their own grouping; the
//! admin sees the global counts plus the per-department breakdown.

use axum::extract::State;
use axum::Json;
use pmdash_core::project::{summarize, ProgressSummary};
use pmdash_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
pub async fn summary(
    caller: Caller,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProgressSummary>>> {
    let rows = match caller.department_id() {
        Some(dept_id) => ProjectRepo::progress_rows_for_department(&state.pool, dept_id).await?,
        None => ProjectRepo::progress_rows_all(&state.pool).await?,
    };

    let summary = summarize(rows.iter().map(|(dept, progress)| (dept.as_str(), *progress)));
    Ok(Json(DataResponse { data: summary }))
}
