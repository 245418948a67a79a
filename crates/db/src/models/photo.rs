//! Photo attachment model and DTOs.

use pmdash_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A photo reference row from the `project_photos` table.
///
/// Holds only the public URL and the object-store key used for deletion;
/// binary content lives in the external store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPhoto {
    pub id: DbId,
    pub project_id: DbId,
    pub url: String,
    pub storage_key: String,
    pub uploaded_at: Timestamp,
}

/// DTO for recording a successfully uploaded photo.
pub struct CreatePhoto {
    pub project_id: DbId,
    pub url: String,
    pub storage_key: String,
}
