//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.
//! There are no refresh tokens or server-side sessions: a caller stays
//! signed in until its single token expires or the client discards it.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pmdash_core::roles::{ROLE_ADMIN, ROLE_DEPARTMENT};
use pmdash_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the department's database id; `0` for the admin, which
    /// has no database row.
    pub sub: DbId,
    /// Role name: `"admin"` or `"department"`.
    pub role: String,
    /// Department name for department tokens, absent for admin tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 720, i.e. 12 hours --
    /// the legacy flag-in-storage model had no expiry at all).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 720;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `720`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for a department.
pub fn generate_department_token(
    department_id: DbId,
    department_name: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(department_id, ROLE_DEPARTMENT, Some(department_name), config)
}

/// Generate an HS256 access token for the admin identity.
pub fn generate_admin_token(config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(0, ROLE_ADMIN, None, config)
}

fn generate_token(
    sub: DbId,
    role: &str,
    dept: Option<&str>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub,
        role: role.to_string(),
        dept: dept.map(str::to_string),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration, and issued-at claims automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 720,
        }
    }

    #[test]
    fn department_token_roundtrip() {
        let config = test_config();
        let token = generate_department_token(7, "Agriculture", &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, ROLE_DEPARTMENT);
        assert_eq!(claims.dept.as_deref(), Some("Agriculture"));
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn admin_token_has_no_department() {
        let config = test_config();
        let token = generate_admin_token(&config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 0);
        assert_eq!(claims.role, ROLE_ADMIN);
        assert!(claims.dept.is_none());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Manually craft a token expired well past the default 60s leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: ROLE_DEPARTMENT.to_string(),
            dept: Some("PWD".to_string()),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret-entirely".to_string(),
            access_token_expiry_mins: 720,
        };

        let token = generate_department_token(1, "Forestry", &config_a)
            .expect("token generation should succeed");

        assert!(validate_token(&token, &config_b).is_err());
    }
}
