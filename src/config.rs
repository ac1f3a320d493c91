use crate::store::StorageBackend;
use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub landing_path: String,
    pub log_dir: String,

    // Upload limits (bytes)
    pub max_picture_bytes: usize,
    pub max_import_bytes: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_signup_per_min: u32,
    pub rate_import_per_min: u32,
    pub rate_api_per_min: u32,

    pub api_prefix: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(key, default);
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{key}={raw:?} is invalid: {e}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend: StorageBackend = parse_var("STORAGE_BACKEND", "memory")?;
        let database_url = env::var("DATABASE_URL").ok();

        if storage_backend == StorageBackend::Mysql && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=mysql"));
        }

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            storage_backend,
            database_url,
            landing_path: var_or("LANDING_PATH", "index.html"),
            log_dir: var_or("LOG_DIR", "logs"),

            max_picture_bytes: parse_var("MAX_PICTURE_BYTES", "5242880")?, // 5 MiB
            max_import_bytes: parse_var("MAX_IMPORT_BYTES", "10485760")?, // 10 MiB

            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", "60")?,
            rate_signup_per_min: parse_var("RATE_SIGNUP_PER_MIN", "30")?,
            rate_import_per_min: parse_var("RATE_IMPORT_PER_MIN", "30")?,
            rate_api_per_min: parse_var("RATE_API_PER_MIN", "1000")?,

            api_prefix: var_or("API_PREFIX", "/api"),
        })
    }

    /// Settings used by handler tests; in-memory storage, small limits.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            storage_backend: StorageBackend::Memory,
            database_url: None,
            landing_path: "index.html".to_string(),
            log_dir: "logs".to_string(),
            max_picture_bytes: 64 * 1024,
            max_import_bytes: 1024 * 1024,
            rate_login_per_min: 1000,
            rate_signup_per_min: 1000,
            rate_import_per_min: 1000,
            rate_api_per_min: 1000,
            api_prefix: "/api".to_string(),
        }
    }
}
