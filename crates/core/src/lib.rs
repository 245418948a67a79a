//! Domain core for the project monitoring dashboard.
//!
//! Pure types and invariant checks shared by the database and API crates:
//! the error taxonomy, role constants, project/progress validation, the
//! derived progress aggregates, and photo attachment constraints.

pub mod attachment;
pub mod error;
pub mod project;
pub mod roles;
pub mod types;
