//! Project invariants and derived progress aggregates.
//!
//! Progress is an integer percentage; a project is "completed" exactly when
//! it reaches [`COMPLETED_PROGRESS`]. Aggregates are recomputed from the
//! current rows on every read and never cached.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lower bound of the progress percentage.
pub const MIN_PROGRESS: i16 = 0;

/// Upper bound of the progress percentage; also the "completed" state.
pub const COMPLETED_PROGRESS: i16 = 100;

// ---------------------------------------------------------------------------
// Invariant checks
// ---------------------------------------------------------------------------

/// Validate that `progress` lies within `0..=100`.
pub fn validate_progress(progress: i16) -> Result<(), CoreError> {
    if (MIN_PROGRESS..=COMPLETED_PROGRESS).contains(&progress) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Progress must be between {MIN_PROGRESS} and {COMPLETED_PROGRESS}, got {progress}"
        )))
    }
}

/// Validate that an allocated budget is strictly positive.
pub fn validate_budget(budget_allocated: f64) -> Result<(), CoreError> {
    if budget_allocated > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Budget allocated must be greater than 0".into(),
        ))
    }
}

/// Whether a progress value denotes the Completed state.
pub fn is_completed(progress: i16) -> bool {
    progress == COMPLETED_PROGRESS
}

// ---------------------------------------------------------------------------
// Derived aggregates
// ---------------------------------------------------------------------------

/// Completed/pending counts for a single department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentBreakdown {
    pub department: String,
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

/// Global completed/pending counts plus the per-department breakdown.
///
/// Invariant: `completed + pending == total`, globally and per department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub departments: Vec<DepartmentBreakdown>,
}

/// Compute the progress summary over `(department name, progress)` rows.
///
/// Departments are ordered by name so the output is deterministic.
pub fn summarize<'a, I>(rows: I) -> ProgressSummary
where
    I: IntoIterator<Item = (&'a str, i16)>,
{
    let mut by_dept: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    let mut total = 0i64;
    let mut completed = 0i64;

    for (department, progress) in rows {
        let entry = by_dept.entry(department).or_insert((0, 0));
        entry.0 += 1;
        total += 1;
        if is_completed(progress) {
            entry.1 += 1;
            completed += 1;
        }
    }

    let departments = by_dept
        .into_iter()
        .map(|(department, (dept_total, dept_completed))| DepartmentBreakdown {
            department: department.to_string(),
            total: dept_total,
            completed: dept_completed,
            pending: dept_total - dept_completed,
        })
        .collect();

    ProgressSummary {
        total,
        completed,
        pending: total - completed,
        departments,
    }
}
