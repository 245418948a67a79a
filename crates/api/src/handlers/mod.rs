pub mod auth;
pub mod dashboard;
pub mod photos;
pub mod project;
