//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pmdash_core::error::CoreError;
use pmdash_core::roles::ROLE_ADMIN;
use pmdash_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The department identity carried by a department access token.
#[derive(Debug, Clone)]
pub struct DepartmentIdentity {
    /// The department's internal database id (from `claims.sub`).
    pub id: DbId,
    /// The department name (from `claims.dept`).
    pub name: String,
}

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that accepts both
/// the admin and department callers:
///
/// ```ignore
/// async fn my_handler(caller: Caller) -> AppResult<Json<()>> {
///     if let Caller::Department(dept) = &caller {
///         tracing::info!(department = %dept.name, "handling request");
///     }
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub enum Caller {
    /// The single privileged identity; sees and may mutate everything.
    Admin,
    /// A department, strictly scoped to its own projects.
    Department(DepartmentIdentity),
}

impl Caller {
    /// The caller's department scope, `None` for the admin.
    pub fn department_id(&self) -> Option<DbId> {
        match self {
            Caller::Admin => None,
            Caller::Department(dept) => Some(dept.id),
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if claims.role == ROLE_ADMIN {
            return Ok(Caller::Admin);
        }

        let name = claims.dept.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Department token is missing its department claim".into(),
            ))
        })?;

        Ok(Caller::Department(DepartmentIdentity {
            id: claims.sub,
            name,
        }))
    }
}
