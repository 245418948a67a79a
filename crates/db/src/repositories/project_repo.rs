//! Repository for the `projects` table.
//!
//! Every read joins the owning department so callers always see the
//! department name alongside the foreign key. Listings come back in
//! insertion order (by id).

use pmdash_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProjectReport};

/// Joined column list shared across queries to avoid repetition.
const COLUMNS: &str = "p.id, p.name, p.progress, p.start_date, p.end_date, \
                        p.department_id, d.name AS department, \
                        p.budget_allocated, p.remaining_budget, \
                        p.contact_person, p.designation, p.contact_number, \
                        p.remarks, p.geo_lat, p.geo_lng, \
                        p.created_at, p.updated_at";

const FROM_JOINED: &str = "FROM projects p JOIN departments d ON d.id = p.department_id";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `department_id`, returning the joined row.
    ///
    /// `remaining_budget` starts equal to the allocation; the daily-report
    /// update is the only writer afterwards.
    pub async fn create(
        pool: &PgPool,
        department_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let id: (DbId,) = sqlx::query_as(
            "INSERT INTO projects
                (name, progress, start_date, end_date, department_id,
                 budget_allocated, remaining_budget,
                 contact_person, designation, contact_number,
                 remarks, geo_lat, geo_lng)
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $8, $9, COALESCE($10, ''), $11, $12)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.progress)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(department_id)
        .bind(input.budget_allocated)
        .bind(&input.contact_person)
        .bind(&input.designation)
        .bind(&input.contact_number)
        .bind(&input.remarks)
        .bind(input.geo_lat)
        .bind(input.geo_lng)
        .fetch_one(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} {FROM_JOINED} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id.0)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_JOINED} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID, restricted to one department's scope.
    pub async fn find_by_id_for_department(
        pool: &PgPool,
        id: DbId,
        department_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} {FROM_JOINED} WHERE p.id = $1 AND p.department_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(department_id)
            .fetch_optional(pool)
            .await
    }

    /// List every project (the admin "all" view), in insertion order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_JOINED} ORDER BY p.id");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List one department's projects, in insertion order.
    pub async fn list_by_department(
        pool: &PgPool,
        department_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM_JOINED} WHERE p.department_id = $1 ORDER BY p.id");
        sqlx::query_as::<_, Project>(&query)
            .bind(department_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a daily-report update. Only non-`None` fields are written.
    ///
    /// When `department_id` is `Some`, the update is scoped to that
    /// department and a project outside its scope behaves as missing.
    /// Returns `None` if no row matched.
    pub async fn update_report(
        pool: &PgPool,
        id: DbId,
        department_id: Option<DbId>,
        input: &UpdateProjectReport,
    ) -> Result<Option<Project>, sqlx::Error> {
        let updated: Option<(DbId,)> = sqlx::query_as(
            "UPDATE projects SET
                progress = COALESCE($2, progress),
                remarks = COALESCE($3, remarks),
                remaining_budget = COALESCE($4, remaining_budget),
                updated_at = NOW()
             WHERE id = $1 AND ($5::BIGINT IS NULL OR department_id = $5)
             RETURNING id",
        )
        .bind(id)
        .bind(input.progress)
        .bind(&input.remarks)
        .bind(input.remaining_budget)
        .bind(department_id)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some((id,)) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a project. Photo rows cascade via the FK;
    /// stored objects are the caller's responsibility.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch `(department name, progress)` for every project. Input to the
    /// aggregate computation; recomputed on every read, never cached.
    pub async fn progress_rows_all(pool: &PgPool) -> Result<Vec<(String, i16)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT d.name, p.progress
             FROM projects p JOIN departments d ON d.id = p.department_id
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Fetch `(department name, progress)` rows for a single department.
    pub async fn progress_rows_for_department(
        pool: &PgPool,
        department_id: DbId,
    ) -> Result<Vec<(String, i16)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT d.name, p.progress
             FROM projects p JOIN departments d ON d.id = p.department_id
             WHERE p.department_id = $1
             ORDER BY p.id",
        )
        .bind(department_id)
        .fetch_all(pool)
        .await
    }
}
