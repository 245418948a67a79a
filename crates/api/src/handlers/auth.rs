//! Handlers for the `/auth` resource: department signup and login, the
//! fixed-credential admin login, and the token-based password-reset flow.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pmdash_core::error::CoreError;
use pmdash_db::models::department::{CreateDepartment, DepartmentResponse};
use pmdash_db::repositories::DepartmentRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_admin_token, generate_department_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::reset::{generate_reset_token, hash_reset_token, RESET_TOKEN_EXPIRY_MINS};
use crate::email::send_reset_email;
use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub dept_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login` and `POST /auth/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful department authentication response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub department: DepartmentResponse,
}

/// Successful admin authentication response.
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub role: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a department. Name and email are globally unique; violations
/// surface as 409 `DUPLICATE_KEY` via the shared sqlx classifier.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DepartmentResponse>)> {
    if input.dept_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Department name must not be empty".into(),
        )));
    }
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let department = DepartmentRepo::create(
        &state.pool,
        &CreateDepartment {
            name: input.dept_name.trim().to_string(),
            email: input.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(department_id = department.id, department = %department.name, "Department registered");

    Ok((StatusCode::CREATED, Json(department.into_response())))
}

/// POST /api/v1/auth/login
///
/// Authenticate a department with email + password. Returns the access
/// token the client persists for the browsing session.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let department = DepartmentRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &department.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let access_token = generate_department_token(department.id, &department.name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        department: department.into_response(),
    }))
}

/// POST /api/v1/auth/admin/login
///
/// Authenticate the single admin identity against the configured
/// credential pair. 403 when no pair is configured.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AdminLoginResponse>> {
    let admin = state.config.admin.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::Forbidden("Admin login is not configured".into()))
    })?;

    if input.email != admin.email || input.password != admin.password {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let access_token = generate_admin_token(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AdminLoginResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        role: pmdash_core::roles::ROLE_ADMIN.to_string(),
    }))
}

/// POST /api/v1/auth/forgot-password
///
/// Store a reset-token digest + expiry on the department row and mail the
/// reset link. Without SMTP configuration the link is logged instead, so
/// local development still has a usable flow.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let department = DepartmentRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No department registered with this email".into())
        })?;

    let (token, token_hash) = generate_reset_token();
    let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_EXPIRY_MINS);

    DepartmentRepo::set_reset_token(&state.pool, department.id, &token_hash, expires_at).await?;

    let reset_link = format!(
        "{}/dept-reset-password?token={token}&email={}",
        state.config.app_base_url, department.email
    );

    match &state.config.smtp {
        Some(smtp) => {
            send_reset_email(smtp, &department.email, &reset_link)
                .await
                .map_err(|e| AppError::InternalError(format!("Email delivery error: {e}")))?;
        }
        None => {
            tracing::info!(department = %department.name, %reset_link, "SMTP not configured; reset link logged");
        }
    }

    Ok(Json(MessageResponse {
        message: "Reset link sent on your email",
    }))
}

/// POST /api/v1/auth/reset-password
///
/// Exchange a valid reset token for a new password. The stored digest and
/// expiry are cleared on success.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let department = DepartmentRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No department registered with this email".into())
        })?;

    let stored_hash = department.reset_token_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired reset token".into()))
    })?;

    let expired = department
        .reset_token_expires_at
        .map_or(true, |expiry| expiry < Utc::now());

    if expired || stored_hash != hash_reset_token(&input.token) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or expired reset token".into(),
        )));
    }

    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    DepartmentRepo::update_password(&state.pool, department.id, &password_hash).await?;

    tracing::info!(department_id = department.id, "Password reset completed");

    Ok(Json(MessageResponse {
        message: "Password reset successfully",
    }))
}
