pub mod auth;
pub mod dashboard;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                      department signup (public)
/// /auth/login                       department login (public)
/// /auth/admin/login                 admin login (public)
/// /auth/forgot-password             request reset link (public)
/// /auth/reset-password              redeem reset token (public)
///
/// /projects                         list (scoped), create (department)
/// /projects/{id}                    get, daily-report update (multipart), delete
/// /projects/{id}/photos             append photo batch (multipart)
/// /projects/{id}/photos/{photo_id}  remove photo + stored object
///
/// /dashboard/summary                completed/pending aggregates (scoped)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and the password-reset flow.
        .nest("/auth", auth::router())
        // Project CRUD, daily reports, and photo attachments.
        .nest("/projects", project::router())
        // Derived progress aggregates.
        .nest("/dashboard", dashboard::router())
}
