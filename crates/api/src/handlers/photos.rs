//! Photo attachment handlers and the shared append pipeline.
//!
//! Appending is all-or-nothing: every file is validated before the first
//! upload, objects go to the store first, and the reference rows land in a
//! single multi-row insert only after every upload succeeded. A failure at
//! any point leaves the photos list untouched (already-stored objects are
//! removed best-effort).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmdash_core::attachment::{
    extension_for, validate_batch_capacity, validate_photo_file,
};
use pmdash_core::error::CoreError;
use pmdash_core::types::DbId;
use pmdash_db::models::photo::{CreatePhoto, ProjectPhoto};
use pmdash_db::repositories::{PhotoRepo, ProjectRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

/// An uploaded file pulled out of a multipart body.
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read a multipart field into an [`UploadedFile`].
pub async fn read_file_field(
    field: axum::extract::multipart::Field<'_>,
) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().unwrap_or("photo").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(UploadedFile {
        filename,
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// Resolve a project for a photo mutation, scoped to the caller.
///
/// Department callers see other departments' projects as missing, the
/// same way the daily-report update does.
async fn resolve_project_scope(
    state: &AppState,
    caller: &Caller,
    project_id: DbId,
) -> AppResult<()> {
    let project = match caller.department_id() {
        Some(dept_id) => {
            ProjectRepo::find_by_id_for_department(&state.pool, project_id, dept_id).await?
        }
        None => ProjectRepo::find_by_id(&state.pool, project_id).await?,
    };
    project
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
}

/// Validate, upload, and record a photo batch for a project.
///
/// Shared by `POST /projects/{id}/photos` and the multipart daily-report
/// update. Returns the newly created reference rows.
pub async fn append_photos(
    state: &AppState,
    project_id: DbId,
    files: Vec<UploadedFile>,
) -> AppResult<Vec<ProjectPhoto>> {
    // Validate everything before a single byte is uploaded.
    let existing = PhotoRepo::count_by_project(&state.pool, project_id).await?;
    validate_batch_capacity(existing as usize, files.len()).map_err(AppError::Core)?;
    for file in &files {
        validate_photo_file(&file.filename, &file.content_type, &file.bytes)
            .map_err(AppError::Core)?;
    }

    // Upload first; references are only written once every object is stored.
    let mut stored: Vec<CreatePhoto> = Vec::with_capacity(files.len());
    for file in files {
        let key = format!(
            "projects/{project_id}/{}.{}",
            Uuid::new_v4(),
            extension_for(&file.content_type)
        );
        match state
            .photo_store
            .put(&key, file.bytes, &file.content_type)
            .await
        {
            Ok(url) => stored.push(CreatePhoto {
                project_id,
                url,
                storage_key: key,
            }),
            Err(e) => {
                rollback_uploads(state, &stored).await;
                return Err(AppError::Core(CoreError::Upload(format!(
                    "Failed to store '{}': {e}",
                    file.filename
                ))));
            }
        }
    }

    match PhotoRepo::insert_batch(&state.pool, &stored).await {
        Ok(photos) => Ok(photos),
        Err(e) => {
            rollback_uploads(state, &stored).await;
            Err(e.into())
        }
    }
}

/// Best-effort removal of objects whose references never got committed.
async fn rollback_uploads(state: &AppState, stored: &[CreatePhoto]) {
    for photo in stored {
        if let Err(e) = state.photo_store.delete(&photo.storage_key).await {
            tracing::warn!(key = %photo.storage_key, error = %e, "Failed to clean up orphaned photo object");
        }
    }
}

/// POST /api/v1/projects/{id}/photos
///
/// Append up to 5-minus-existing photos from a multipart body. The whole
/// batch is rejected when it would pass the cap.
pub async fn add_photos(
    caller: Caller,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<ProjectPhoto>>>)> {
    resolve_project_scope(&state, &caller, project_id).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "photos" {
            files.push(read_file_field(field).await?);
        }
    }

    let photos = append_photos(&state, project_id, files).await?;

    tracing::info!(project_id, count = photos.len(), "Photos appended");

    Ok((StatusCode::CREATED, Json(DataResponse { data: photos })))
}

/// DELETE /api/v1/projects/{id}/photos/{photo_id}
///
/// Delete the stored object by its recorded key, then drop the reference
/// row. The row survives if the store refuses the delete.
pub async fn remove_photo(
    caller: Caller,
    State(state): State<AppState>,
    Path((project_id, photo_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    resolve_project_scope(&state, &caller, project_id).await?;

    let photo = PhotoRepo::find_by_id(&state.pool, project_id, photo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Photo",
            id: photo_id,
        }))?;

    state
        .photo_store
        .delete(&photo.storage_key)
        .await
        .map_err(|e| AppError::Core(CoreError::Upload(format!("Failed to delete object: {e}"))))?;

    PhotoRepo::delete_by_id(&state.pool, photo_id).await?;

    tracing::info!(project_id, photo_id, key = %photo.storage_key, "Photo removed");

    Ok(StatusCode::NO_CONTENT)
}
