//! Well-known role name constants carried in access-token claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_DEPARTMENT: &str = "department";
