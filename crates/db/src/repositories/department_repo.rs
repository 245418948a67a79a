//! Repository for the `departments` table.

use pmdash_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::department::{CreateDepartment, Department};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, reset_token_hash, \
                        reset_token_expires_at, created_at, updated_at";

/// Provides CRUD operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Insert a new department, returning the created row.
    ///
    /// Duplicate name or email surfaces as a 23505 unique violation on the
    /// `uq_departments_*` constraints.
    pub async fn create(pool: &PgPool, input: &CreateDepartment) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a department by email (case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE email = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a department by name (case-sensitive).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE name = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Store a password-reset token digest and its expiry.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE departments SET
                reset_token_hash = $2,
                reset_token_expires_at = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear any outstanding reset token.
    ///
    /// Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE departments SET
                password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
