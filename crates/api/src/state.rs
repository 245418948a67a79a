use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::PhotoStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pmdash_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Object store holding uploaded photo binaries.
    pub photo_store: Arc<dyn PhotoStore>,
}
