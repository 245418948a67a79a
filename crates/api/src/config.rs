use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::email::EmailConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Fixed admin credential pair. `None` disables admin login.
    pub admin: Option<AdminConfig>,
    /// Photo object-store backend selection.
    pub photo_storage: PhotoStorageConfig,
    /// Optional SMTP configuration for password-reset mails.
    pub smtp: Option<EmailConfig>,
    /// Public base URL of the frontend, used to build reset links
    /// (default: `http://localhost:5173`).
    pub app_base_url: String,
}

/// The single privileged identity. There is exactly one admin, checked
/// against this pair; it has no database row.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl AdminConfig {
    /// Load from `ADMIN_EMAIL` / `ADMIN_PASSWORD`. Returns `None` when
    /// either is missing, signalling that admin login is disabled.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok()?;
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        Some(Self { email, password })
    }
}

/// Where uploaded photo objects live.
#[derive(Debug, Clone)]
pub enum PhotoStorageConfig {
    /// Files on local disk under `root`, served at `public_base_url`.
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    /// An S3 bucket; URLs are derived from bucket/region unless
    /// `public_base_url` overrides them (e.g. a CDN).
    S3 {
        bucket: String,
        region: String,
        public_base_url: Option<String>,
    },
}

impl PhotoStorageConfig {
    /// Load from environment variables.
    ///
    /// | Env Var                 | Default                            |
    /// |-------------------------|------------------------------------|
    /// | `PHOTO_STORAGE_BACKEND` | `local`                            |
    /// | `PHOTO_STORAGE_ROOT`    | `storage/photos`                   |
    /// | `PHOTO_PUBLIC_BASE_URL` | `http://localhost:8000/photos`     |
    /// | `S3_BUCKET`             | required when backend is `s3`      |
    /// | `S3_REGION`             | `us-east-1`                        |
    ///
    /// # Panics
    ///
    /// Panics when the backend is `s3` and `S3_BUCKET` is not set, or the
    /// backend name is unknown -- misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let backend =
            std::env::var("PHOTO_STORAGE_BACKEND").unwrap_or_else(|_| "local".into());

        match backend.as_str() {
            "local" => Self::Local {
                root: std::env::var("PHOTO_STORAGE_ROOT")
                    .unwrap_or_else(|_| "storage/photos".into())
                    .into(),
                public_base_url: std::env::var("PHOTO_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/photos".into()),
            },
            "s3" => Self::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when PHOTO_STORAGE_BACKEND=s3"),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                public_base_url: std::env::var("PHOTO_PUBLIC_BASE_URL").ok(),
            },
            other => panic!("Unknown PHOTO_STORAGE_BACKEND '{other}'. Must be: local, s3"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_BASE_URL`         | `http://localhost:5173`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            photo_storage: PhotoStorageConfig::from_env(),
            smtp: EmailConfig::from_env(),
            app_base_url,
        }
    }
}
