//! Route definitions for the `/projects` resource.
//!
//! Photo attachments are nested under their project:
//! `/projects/{id}/photos[/{photo_id}]`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{photos, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update_report (multipart)
/// DELETE /{id}                      -> delete
///
/// POST   /{id}/photos               -> add_photos (multipart)
/// DELETE /{id}/photos/{photo_id}    -> remove_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update_report)
                .delete(project::delete),
        )
        .route("/{id}/photos", post(photos::add_photos))
        .route("/{id}/photos/{photo_id}", delete(photos::remove_photo))
}
