use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, ensure, Result};
use tracing::info;

pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self {
            port: try_load("ALUMNET_PORT", "5000")?,
            db_path: try_load("ALUMNET_DB_PATH", "alumnet-db")?,
            session_ttl_days: try_load("ALUMNET_SESSION_TTL_DAYS", "30")?,
        };
        ensure!(
            (1..=3650).contains(&config.session_ttl_days),
            "ALUMNET_SESSION_TTL_DAYS must be between 1 and 3650"
        );
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            db_path: "alumnet-db".to_string(),
            session_ttl_days: 30,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}
