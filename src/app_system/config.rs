use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_SESSION_MAX_AGE_HOURS: i64 = 7 * 24;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@collegeprojects.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEV_SECRET_KEY: &str = "dev-secret-key-change-this-in-production";
const DEFAULT_EXTENSIONS: &str = "zip,rar,7z,tar,gz,pdf,png,jpg,jpeg,gif,webp";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub secret_key: String,
    pub upload_dir: PathBuf,
    /// One JSON file per record table lives here.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub session_max_age_hours: i64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "8000")?,
            secret_key: load_secret("SECRET_KEY"),
            upload_dir: try_load("UPLOAD_DIR", "uploads")?,
            data_dir: try_load("DATA_DIR", "data")?,
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?,
            allowed_extensions: parse_list(&load_or("ALLOWED_EXTENSIONS", DEFAULT_EXTENSIONS)),
            admin_email: load_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
            admin_password: load_secret_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            session_max_age_hours: session_max_age(&load_or(
                "SESSION_MAX_AGE_HOURS",
                &DEFAULT_SESSION_MAX_AGE_HOURS.to_string(),
            ))?,
        })
    }

    /// Defaults with uploads and tables under a disposable `root`.
    #[cfg(test)]
    pub fn for_tests(root: &std::path::Path) -> Self {
        Self {
            port: 0,
            secret_key: "test-secret".to_string(),
            upload_dir: root.join("uploads"),
            data_dir: root.join("data"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: parse_list(DEFAULT_EXTENSIONS),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            session_max_age_hours: DEFAULT_SESSION_MAX_AGE_HOURS,
        }
    }

    pub fn session_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_max_age_hours)
    }
}

/// Hours, capped at ten years so the duration never overflows.
fn session_max_age(raw: &str) -> Result<i64, ConfigError> {
    let hours: i64 = parse("SESSION_MAX_AGE_HOURS", raw)?;
    if !(0..=24 * 365 * 10).contains(&hours) {
        return Err(ConfigError::Invalid {
            key: "SESSION_MAX_AGE_HOURS".to_string(),
            message: format!("{hours} is out of range"),
        });
    }
    Ok(hours)
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse(key, &load_or(key, default))
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Environment first, then a mounted secret, then `default`.
fn load_secret_or(key: &str, default: &str) -> String {
    if let Some(value) = var(key) {
        return value;
    }
    let path = format!("/run/secrets/{key}");
    match read_to_string(&path) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            warn!("{key} not provided, using the built-in default");
            default.to_string()
        }
    }
}

fn load_secret(key: &str) -> String {
    load_secret_or(key, DEV_SECRET_KEY)
}
