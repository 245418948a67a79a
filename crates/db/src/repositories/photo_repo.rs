//! Repository for the `project_photos` table.

use pmdash_core::types::DbId;
use sqlx::PgPool;

use crate::models::photo::{CreatePhoto, ProjectPhoto};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, url, storage_key, uploaded_at";

/// Provides CRUD operations for photo attachments.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Record an entire batch of uploaded photos in one statement.
    ///
    /// A single multi-row INSERT keeps the append atomic: either every
    /// reference lands or none does. Rows come back in insertion order.
    pub async fn insert_batch(
        pool: &PgPool,
        batch: &[CreatePhoto],
    ) -> Result<Vec<ProjectPhoto>, sqlx::Error> {
        let project_ids: Vec<DbId> = batch.iter().map(|p| p.project_id).collect();
        let urls: Vec<String> = batch.iter().map(|p| p.url.clone()).collect();
        let keys: Vec<String> = batch.iter().map(|p| p.storage_key.clone()).collect();

        let query = format!(
            "INSERT INTO project_photos (project_id, url, storage_key)
             SELECT * FROM UNNEST($1::BIGINT[], $2::TEXT[], $3::TEXT[])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(&project_ids)
            .bind(&urls)
            .bind(&keys)
            .fetch_all(pool)
            .await
    }

    /// List a project's photos in insertion order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectPhoto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_photos WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List photos for a set of projects in one query, in insertion order.
    /// Used by project listings to avoid a query per row.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectPhoto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_photos WHERE project_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Count a project's stored photos.
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_photos WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Find one photo scoped to its project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<ProjectPhoto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_photos WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove one photo reference. Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the storage keys of a project's photos, for object cleanup
    /// before the project row (and, via FK cascade, these rows) go away.
    pub async fn list_keys_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let keys: Vec<(String,)> =
            sqlx::query_as("SELECT storage_key FROM project_photos WHERE project_id = $1 ORDER BY id")
                .bind(project_id)
                .fetch_all(pool)
                .await?;
        Ok(keys.into_iter().map(|(k,)| k).collect())
    }
}
