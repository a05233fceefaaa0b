use std::str::FromStr;

pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024; // 16MB
pub const DEFAULT_UPLOAD_DIR: &str = "uploads/";
pub const DEFAULT_THUMBNAIL_DIR: &str = "thumbnails/";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 300;

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "image";

pub const THEME_COOKIE: &str = "theme";
pub const FLASH_COOKIE: &str = "flash";
pub const DEFAULT_THEME: &str = "flatty";
pub const THEMES: [&str; 4] = ["flatty", "darkly", "cosmo", "sandstone"];

#[derive(Debug, thiserror::Error)]
#[error("{key} has invalid value {value:?}")]
pub struct EnvError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Env {
    pub ip: String,
    pub port: u16,
    pub upload_dir: String,
    pub thumbnail_dir: String,
    pub max_upload_size: usize,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

fn var_or(key: &'static str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, EnvError> {
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| EnvError { key, value }),
        Err(_) => Ok(default),
    }
}

fn non_zero(key: &'static str, default: u32) -> Result<u32, EnvError> {
    match parsed_or(key, default)? {
        0 => Err(EnvError { key, value: "0".to_string() }),
        value => Ok(value),
    }
}

impl Env {
    /// Read settings from the environment (and `.env`, loaded by the caller)
    pub fn load() -> Result<Self, EnvError> {
        Ok(Env {
            ip: var_or("IP", "127.0.0.1"),
            port: parsed_or("PORT", 8080)?,
            upload_dir: var_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            thumbnail_dir: var_or("THUMBNAIL_DIR", DEFAULT_THUMBNAIL_DIR),
            max_upload_size: parsed_or("MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE)?,
            thumbnail_width: non_zero("THUMBNAIL_WIDTH", DEFAULT_THUMBNAIL_SIZE)?,
            thumbnail_height: non_zero("THUMBNAIL_HEIGHT", DEFAULT_THUMBNAIL_SIZE)?,
        })
    }
}
