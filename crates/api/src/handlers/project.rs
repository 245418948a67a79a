//! Handlers for the `/projects` resource.
//!
//! Scoping rule: department callers operate strictly inside their own
//! scope -- other departments' projects behave as missing on reads and
//! report updates, and are forbidden to delete. The admin sees everything.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pmdash_core::error::CoreError;
use pmdash_core::project::{validate_budget, validate_progress};
use pmdash_core::types::DbId;
use pmdash_db::models::photo::ProjectPhoto;
use pmdash_db::models::project::{CreateProject, Project, UpdateProjectReport};
use pmdash_db::repositories::{DepartmentRepo, PhotoRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::photos::{append_photos, read_file_field, UploadedFile};
use crate::middleware::auth::Caller;
use crate::middleware::rbac::RequireDepartment;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query params for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Admin-only: scope the listing to one department by name.
    pub department: Option<String>,
    /// Accepted for interface compatibility; the admin listing is
    /// unscoped by default, so this flag changes nothing.
    #[serde(default)]
    pub all: bool,
}

/// A project together with its photo references, the shape every read
/// path returns.
#[derive(Debug, Serialize)]
pub struct ProjectWithPhotos {
    #[serde(flatten)]
    pub project: Project,
    pub photos: Vec<ProjectPhoto>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Attach photo references to a list of projects with a single query.
async fn with_photos(
    pool: &pmdash_db::DbPool,
    projects: Vec<Project>,
) -> Result<Vec<ProjectWithPhotos>, sqlx::Error> {
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let photos = PhotoRepo::list_by_projects(pool, &ids).await?;

    let mut by_project: std::collections::HashMap<DbId, Vec<ProjectPhoto>> =
        std::collections::HashMap::new();
    for photo in photos {
        by_project.entry(photo.project_id).or_default().push(photo);
    }

    Ok(projects
        .into_iter()
        .map(|project| {
            let photos = by_project.remove(&project.id).unwrap_or_default();
            ProjectWithPhotos { project, photos }
        })
        .collect())
}

/// Fetch one project in the caller's scope, or 404.
async fn find_scoped(
    state: &AppState,
    caller: &Caller,
    id: DbId,
) -> AppResult<Project> {
    let project = match caller.department_id() {
        Some(dept_id) => ProjectRepo::find_by_id_for_department(&state.pool, id, dept_id).await?,
        None => ProjectRepo::find_by_id(&state.pool, id).await?,
    };
    project.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Create a project owned by the calling department. The owning
/// department comes from the token, never the body.
pub async fn create(
    RequireDepartment(dept): RequireDepartment,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }
    validate_progress(input.progress).map_err(AppError::Core)?;
    validate_budget(input.budget_allocated).map_err(AppError::Core)?;

    let project = ProjectRepo::create(&state.pool, dept.id, &input).await?;

    tracing::info!(project_id = project.id, department = %dept.name, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Department callers always get their own scope. The admin gets every
/// project, or one department's by `?department=<name>`. No pagination;
/// the whole result set comes back in insertion order.
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithPhotos>>>> {
    let projects = match (&caller, &params.department) {
        (Caller::Department(dept), _) => {
            ProjectRepo::list_by_department(&state.pool, dept.id).await?
        }
        (Caller::Admin, Some(name)) => {
            let department = DepartmentRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("No department named '{name}'"))
                })?;
            ProjectRepo::list_by_department(&state.pool, department.id).await?
        }
        (Caller::Admin, None) => ProjectRepo::list_all(&state.pool).await?,
    };

    let data = with_photos(&state.pool, projects).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithPhotos>> {
    let project = find_scoped(&state, &caller, id).await?;
    let photos = PhotoRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(ProjectWithPhotos { project, photos }))
}

/// PUT /api/v1/projects/{id}
///
/// The daily-report update: a multipart body with optional `progress`,
/// `remarks`, and `remaining_budget` text fields plus optional `photos`
/// files. Lookup is by stable id, scoped to the caller's department.
/// Updates are plain last-write-wins overwrites -- no conflict detection,
/// and nothing stops progress from decreasing.
pub async fn update_report(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<ProjectWithPhotos>> {
    let mut input = UpdateProjectReport::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "progress" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let progress: i16 = text.trim().parse().map_err(|_| {
                    AppError::Core(CoreError::Validation(format!(
                        "Progress must be an integer, got '{}'",
                        text.trim()
                    )))
                })?;
                input.progress = Some(progress);
            }
            "remarks" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                input.remarks = Some(text);
            }
            "remaining_budget" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let remaining: f64 = text.trim().parse().map_err(|_| {
                    AppError::Core(CoreError::Validation(format!(
                        "Remaining budget must be a number, got '{}'",
                        text.trim()
                    )))
                })?;
                input.remaining_budget = Some(remaining);
            }
            "photos" => files.push(read_file_field(field).await?),
            _ => {} // ignore unknown fields
        }
    }

    if let Some(progress) = input.progress {
        validate_progress(progress).map_err(AppError::Core)?;
    }

    // Surface 404 before touching the store, and keep the photo append
    // ahead of the field update so a rejected batch changes nothing.
    find_scoped(&state, &caller, id).await?;

    if !files.is_empty() {
        append_photos(&state, id, files).await?;
    }

    let project = ProjectRepo::update_report(&state.pool, id, caller.department_id(), &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let photos = PhotoRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(ProjectWithPhotos { project, photos }))
}

/// DELETE /api/v1/projects/{id}
///
/// Owning department or admin. Stored photo objects are deleted by key
/// best-effort before the row (photo rows cascade with it).
pub async fn delete(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if let Some(dept_id) = caller.department_id() {
        if project.department_id != dept_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot delete another department's project".into(),
            )));
        }
    }

    let keys = PhotoRepo::list_keys_by_project(&state.pool, id).await?;
    for key in &keys {
        if let Err(e) = state.photo_store.delete(key).await {
            tracing::warn!(project_id = id, %key, error = %e, "Failed to delete photo object");
        }
    }

    ProjectRepo::delete(&state.pool, id).await?;

    tracing::info!(project_id = id, photos = keys.len(), "Project deleted");

    Ok(Json(MessageResponse {
        message: "Project deleted",
    }))
}
