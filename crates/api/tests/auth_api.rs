//! HTTP-level integration tests for signup, login, admin login, and the
//! password-reset flow.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get, post_json};
use pmdash_api::auth::reset::generate_reset_token;
use pmdash_db::repositories::DepartmentRepo;
use sqlx::PgPool;

/// Signup returns 201 with the created identity and no credential fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_success(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({
        "dept_name": "Agriculture",
        "email": "agri@district.test",
        "password": "seed-drill-42"
    });
    let response = post_json(&app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["dept_name"], "Agriculture");
    assert_eq!(json["email"], "agri@district.test");
    assert!(json["id"].is_number());
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
}

/// A second signup with a duplicate name fails with 409 and creates no record.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_duplicate_name(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;

    let first = serde_json::json!({
        "dept_name": "PWD", "email": "pwd@district.test", "password": "culvert-pw-9"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", first).await.status(),
        StatusCode::CREATED
    );

    let duplicate = serde_json::json!({
        "dept_name": "PWD", "email": "other@district.test", "password": "culvert-pw-9"
    });
    let response = post_json(&app, "/api/v1/auth/signup", duplicate).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_KEY");

    // The losing signup must not have created a row.
    let orphan = DepartmentRepo::find_by_email(&pool, "other@district.test")
        .await
        .expect("lookup should succeed");
    assert!(orphan.is_none());
}

/// A second signup with a duplicate email fails with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let first = serde_json::json!({
        "dept_name": "Forestry", "email": "shared@district.test", "password": "teak-pw-31"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", first).await.status(),
        StatusCode::CREATED
    );

    let duplicate = serde_json::json!({
        "dept_name": "Horticulture", "email": "shared@district.test", "password": "teak-pw-31"
    });
    let response = post_json(&app, "/api/v1/auth/signup", duplicate).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Malformed email and short password are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_validation(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let bad_email = serde_json::json!({
        "dept_name": "Vetenary", "email": "not-an-email", "password": "stable-pw-77"
    });
    let response = post_json(&app, "/api/v1/auth/signup", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let short_password = serde_json::json!({
        "dept_name": "Vetenary", "email": "vet@district.test", "password": "short"
    });
    let response = post_json(&app, "/api/v1/auth/signup", short_password).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// End-to-end: signup then login with the same credentials yields the
/// department identity.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_then_login(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let signup = serde_json::json!({
        "dept_name": "Agriculture", "email": "a@x.com", "password": "pw1-long-enough"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", signup).await.status(),
        StatusCode::CREATED
    );

    let login = serde_json::json!({ "email": "a@x.com", "password": "pw1-long-enough" });
    let response = post_json(&app, "/api/v1/auth/login", login).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["department"]["dept_name"], "Agriculture");
}

/// Login with a wrong password or unknown email returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_rejections(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let signup = serde_json::json!({
        "dept_name": "Forestry", "email": "forest@district.test", "password": "sal-grove-12"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", signup).await.status(),
        StatusCode::CREATED
    );

    let wrong_password =
        serde_json::json!({ "email": "forest@district.test", "password": "wrong" });
    let response = post_json(&app, "/api/v1/auth/login", wrong_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = serde_json::json!({ "email": "ghost@district.test", "password": "whatever" });
    let response = post_json(&app, "/api/v1/auth/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Admin login succeeds with the configured pair and rejects others.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_login(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let good = serde_json::json!({
        "email": common::ADMIN_EMAIL, "password": common::ADMIN_PASSWORD
    });
    let response = post_json(&app, "/api/v1/auth/admin/login", good).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "admin");
    assert!(json["access_token"].is_string());

    let bad = serde_json::json!({ "email": common::ADMIN_EMAIL, "password": "nope" });
    let response = post_json(&app, "/api/v1/auth/admin/login", bad).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Protected routes reject missing and malformed tokens.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = get(&app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::get_auth(&app, "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Forgot-password for an unknown email returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({ "email": "nobody@district.test" });
    let response = post_json(&app, "/api/v1/auth/forgot-password", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Forgot-password stores a token digest; redeeming it changes the
/// password and clears the token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_password_reset_flow(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;

    let signup = serde_json::json!({
        "dept_name": "Horticulture", "email": "horti@district.test", "password": "orchard-pw-5"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", signup).await.status(),
        StatusCode::CREATED
    );

    let body = serde_json::json!({ "email": "horti@district.test" });
    let response = post_json(&app, "/api/v1/auth/forgot-password", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let department = DepartmentRepo::find_by_email(&pool, "horti@district.test")
        .await
        .expect("lookup should succeed")
        .expect("department exists");
    assert!(department.reset_token_hash.is_some());
    assert!(department.reset_token_expires_at.expect("expiry set") > Utc::now());

    // The emailed plaintext is unavailable here, so plant a known token
    // the same way the handler does.
    let (token, token_hash) = generate_reset_token();
    let expires_at = Utc::now() + chrono::Duration::minutes(60);
    DepartmentRepo::set_reset_token(&pool, department.id, &token_hash, expires_at)
        .await
        .expect("set token");

    let reset = serde_json::json!({
        "email": "horti@district.test",
        "token": token,
        "new_password": "orchard-pw-new-6"
    });
    let response = post_json(&app, "/api/v1/auth/reset-password", reset).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works; the new one does.
    let old_login =
        serde_json::json!({ "email": "horti@district.test", "password": "orchard-pw-5" });
    let response = post_json(&app, "/api/v1/auth/login", old_login).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new_login =
        serde_json::json!({ "email": "horti@district.test", "password": "orchard-pw-new-6" });
    let response = post_json(&app, "/api/v1/auth/login", new_login).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Token is single-use.
    let department = DepartmentRepo::find_by_email(&pool, "horti@district.test")
        .await
        .expect("lookup should succeed")
        .expect("department exists");
    assert!(department.reset_token_hash.is_none());
}

/// A wrong or expired token is rejected with 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_password_bad_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;

    let signup = serde_json::json!({
        "dept_name": "PWD", "email": "pwd@district.test", "password": "culvert-pw-9"
    });
    assert_eq!(
        post_json(&app, "/api/v1/auth/signup", signup).await.status(),
        StatusCode::CREATED
    );

    // No token requested yet.
    let reset = serde_json::json!({
        "email": "pwd@district.test", "token": "guess", "new_password": "culvert-pw-10"
    });
    let response = post_json(&app, "/api/v1/auth/reset-password", reset).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Expired token.
    let department = DepartmentRepo::find_by_email(&pool, "pwd@district.test")
        .await
        .expect("lookup should succeed")
        .expect("department exists");
    let (token, token_hash) = generate_reset_token();
    let expired_at = Utc::now() - chrono::Duration::minutes(5);
    DepartmentRepo::set_reset_token(&pool, department.id, &token_hash, expired_at)
        .await
        .expect("set token");

    let reset = serde_json::json!({
        "email": "pwd@district.test", "token": token, "new_password": "culvert-pw-10"
    });
    let response = post_json(&app, "/api/v1/auth/reset-password", reset).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The health endpoint reports service and database status.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_health(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
