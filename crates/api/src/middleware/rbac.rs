//! Role-gating extractors.
//!
//! Wraps [`Caller`] and rejects requests whose role does not meet the
//! requirement, enforcing authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pmdash_core::error::CoreError;

use super::auth::{Caller, DepartmentIdentity};
use crate::error::AppError;
use crate::state::AppState;

/// Requires a department caller and yields its identity. Rejects the
/// admin with 403 -- some flows (creating projects, daily reports) only
/// make sense for an owning department.
///
/// ```ignore
/// async fn dept_only(RequireDepartment(dept): RequireDepartment) -> AppResult<Json<()>> {
///     tracing::info!(department = %dept.name, "scoped request");
///     Ok(Json(()))
/// }
/// ```
pub struct RequireDepartment(pub DepartmentIdentity);

impl FromRequestParts<AppState> for RequireDepartment {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await? {
            Caller::Department(dept) => Ok(RequireDepartment(dept)),
            Caller::Admin => Err(AppError::Core(CoreError::Forbidden(
                "Department identity required".into(),
            ))),
        }
    }
}
