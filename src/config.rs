use std::str::FromStr;

use crate::errors::ServerError;

pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 14;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub secret_key: String,
    pub session_ttl_secs: u64,
    pub pool_size: u32,
    pub cors_origin: Option<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    /// Reads the process environment, `.env` included.
    pub fn from_env() -> Result<Self, ServerError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            port: parse(&required("PORT")?, "PORT")?,
            secret_key: required("SECRET_KEY")?,
            session_ttl_secs: optional("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            pool_size: optional("DATABASE_POOL_SIZE", 4)?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.trim().is_empty()),
            rate_limit_per_second: optional("RATE_LIMIT_PER_SECOND", 2)?,
            rate_limit_burst: optional("RATE_LIMIT_BURST", 60)?,
        })
    }
}

fn required(key: &str) -> Result<String, ServerError> {
    std::env::var(key).map_err(|e| ServerError::EnvironmentError(format!("{key}: {e}")))
}

fn optional<T: FromStr>(key: &str, default: T) -> Result<T, ServerError> {
    match std::env::var(key) {
        Ok(value) => parse(&value, key),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(ServerError::EnvironmentError(format!("{key}: {e}"))),
    }
}

fn parse<T: FromStr>(value: &str, key: &str) -> Result<T, ServerError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ServerError::EnvironmentError(format!("{key}: invalid value {value:?}")))
}
