//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Callers must copy what they need out of the read guard before awaiting:
//! `let root = AppConfig::global().storage_root.clone();`

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    /// Bearer token for the admin routes. Empty disables admin access entirely.
    pub admin_token: String,
    /// `local` or `s3`.
    pub storage_backend: String,
    pub storage_root: String,
    /// Top-level folder every object key is placed under.
    pub storage_prefix: String,
    pub storage_public_base_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: String,
    pub pdf_enabled: bool,
    pub submission_requires_payment: bool,
    pub max_create_body_bytes: usize,
    pub max_update_body_bytes: usize,
    pub max_upload_body_bytes: usize,
    pub payment_duplicate_window_minutes: i64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

const MIB: usize = 1024 * 1024;

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a default so the server and the test-suite can start
    /// without a `.env` file; malformed numbers fall back to the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let s3_bucket = var_or("S3_BUCKET", "");
        let s3_public_base_url = env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", s3_bucket));
        let host = var_or("HOST", "127.0.0.1");
        let port = parse_or("PORT", 3000u16);

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "lead-intake"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: flag("LOG_TO_STDOUT", false),
            database_path: var_or("DATABASE_PATH", "data/lead_intake.db"),
            admin_token: var_or("ADMIN_TOKEN", ""),
            storage_backend: var_or("STORAGE_BACKEND", "local").to_lowercase(),
            storage_root: var_or("STORAGE_ROOT", "data/uploads"),
            storage_prefix: var_or("STORAGE_PREFIX", "builtwithme"),
            storage_public_base_url: env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{}:{}/files", host, port)),
            s3_bucket,
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
            s3_public_base_url,
            pdf_enabled: flag("PDF_ENABLED", true),
            submission_requires_payment: flag("SUBMISSION_REQUIRES_PAYMENT", false),
            max_create_body_bytes: parse_or("MAX_CREATE_BODY_BYTES", 50 * MIB),
            max_update_body_bytes: parse_or("MAX_UPDATE_BODY_BYTES", 10 * MIB),
            max_upload_body_bytes: parse_or("MAX_UPLOAD_BODY_BYTES", 10 * MIB),
            payment_duplicate_window_minutes: parse_or("PAYMENT_DUPLICATE_WINDOW_MINUTES", 30),
            host,
            port,
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_admin_token(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.admin_token = value.into());
    }

    pub fn set_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.storage_root = value.into());
    }

    pub fn set_pdf_enabled(value: bool) {
        AppConfig::set_field(|cfg| cfg.pdf_enabled = value);
    }

    pub fn set_submission_requires_payment(value: bool) {
        AppConfig::set_field(|cfg| cfg.submission_requires_payment = value);
    }

    pub fn set_payment_duplicate_window_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.payment_duplicate_window_minutes = value);
    }
}
