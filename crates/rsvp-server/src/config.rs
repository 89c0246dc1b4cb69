use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub guest_seed: Option<PathBuf>,
    /// Request body cap in bytes.
    pub body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            db_path: get("RSVP_DB_PATH").unwrap_or_else(|| "rsvp.db".into()).into(),
            host: get("RSVP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: try_load(&get, "PORT", 3000)?,
            static_dir: get("RSVP_STATIC_DIR").unwrap_or_else(|| "public".into()).into(),
            guest_seed: get("RSVP_GUEST_SEED").filter(|p| !p.is_empty()).map(PathBuf::from),
            body_limit: body_limit_bytes(try_load(&get, "RSVP_BODY_LIMIT_MB", 50)?)?,
        })
    }
}

fn body_limit_bytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .with_context(|| format!("RSVP_BODY_LIMIT_MB value {mb} is too large"))
}

fn try_load<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value '{raw}'")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
