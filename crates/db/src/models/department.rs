//! Department entity model and DTOs.

use pmdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full department row from the `departments` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`DepartmentResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Department {
    /// Strip credential material for API responses.
    pub fn into_response(self) -> DepartmentResponse {
        DepartmentResponse {
            id: self.id,
            dept_name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

/// Safe department representation for API responses (no credential fields).
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentResponse {
    pub id: DbId,
    pub dept_name: String,
    pub email: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
