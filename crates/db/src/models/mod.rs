//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where partial updates exist, an update DTO with all-`Option` fields

pub mod department;
pub mod photo;
pub mod project;
