use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

const DEFAULT_UPLOADS_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// When unset the server falls back to the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            jwt_secret: get_env("JWT_SECRET")?,
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOADS_DIR)),
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }

    /// Configuration for tests and local tooling: in-memory store, given secret and upload dir.
    pub fn for_uploads_dir(jwt_secret: impl Into<String>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            uploads_dir: uploads_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_format: LogFormat::Text,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
