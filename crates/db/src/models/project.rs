//! Project entity model and DTOs.

use chrono::NaiveDate;
use pmdash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row joined with its owning department's name.
///
/// Ownership is a real foreign key (`department_id`); `department` is the
/// resolved name, which is what every read path displays and filters on.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub progress: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub department_id: DbId,
    pub department: String,
    pub budget_allocated: f64,
    pub remaining_budget: f64,
    pub contact_person: String,
    pub designation: String,
    pub contact_number: String,
    pub remarks: String,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
///
/// The owning department comes from the authenticated caller, never from
/// the request body. `remaining_budget` starts equal to the allocation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub progress: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_allocated: f64,
    pub contact_person: String,
    pub designation: String,
    pub contact_number: String,
    #[serde(default)]
    pub remarks: Option<String>,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
}

/// Partial update applied by the daily-report flow. All fields optional;
/// only non-`None` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectReport {
    pub progress: Option<i16>,
    pub remarks: Option<String>,
    pub remaining_budget: Option<f64>,
}
