//! Service configuration from environment variables (`.env` is loaded by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/movies";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_PATH: &str = "/api/Movies";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    /// Schema holding the `movies` table.
    pub schema: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Mount point of the movie routes; also the prefix of `Location` headers.
    pub base_path: String,
    pub body_limit: usize,
    /// Fixed seed for random picks. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_path = get("MOVIES_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.into());
        if !base_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "MOVIES_BASE_PATH",
                message: format!("'{}' must start with '/'", base_path),
            });
        }
        let base_path = match base_path.trim_end_matches('/') {
            "" => "/".to_string(),
            p => p.to_string(),
        };

        Ok(ServiceConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema: get("MOVIES_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            bind_addr: parse_or("MOVIES_BIND_ADDR", get("MOVIES_BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?,
            max_connections: parse_or("MOVIES_MAX_CONNECTIONS", get("MOVIES_MAX_CONNECTIONS"), Some(DEFAULT_MAX_CONNECTIONS))?,
            base_path,
            body_limit: parse_or("MOVIES_BODY_LIMIT", get("MOVIES_BODY_LIMIT"), Some(DEFAULT_BODY_LIMIT))?,
            rng_seed: get("MOVIES_RNG_SEED")
                .map(|v| parse_value("MOVIES_RNG_SEED", &v))
                .transpose()?,
        })
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: format!("'{}': {}", raw, e),
    })
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match (raw, default) {
        (Some(v), _) => parse_value(key, &v),
        (None, Some(d)) => Ok(d),
        (None, None) => Err(ConfigError::Invalid {
            key,
            message: "missing".into(),
        }),
    }
}
