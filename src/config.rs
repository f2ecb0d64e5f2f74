use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// `None` runs the server on the in-process store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Applied to every single storage call.
    pub db_timeout: Duration,
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout: Duration,
    pub bcrypt_cost: u32,
    pub actor_cache_ttl: Duration,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// ✅ Load environment variables and set defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            db_timeout: Duration::from_secs(parse_or("DB_TIMEOUT_SECS", 5)?),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiry: hours_or("JWT_EXPIRY_HOURS", 24)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_or("SERVER_PORT", 8080)?,
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 30)?),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            actor_cache_ttl: Duration::from_secs(parse_or("ACTOR_CACHE_TTL_SECS", 60)?),
            log_dir: env::var("LOG_DIR").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
        })
    }

    /// Settings for tests and local tooling: in-process store, cheap hashing.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            db_max_connections: 1,
            db_timeout: Duration::from_secs(5),
            jwt_secret: jwt_secret.into(),
            jwt_expiry: Duration::from_secs(3600),
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            request_timeout: Duration::from_secs(30),
            bcrypt_cost: 4,
            actor_cache_ttl: Duration::from_secs(60),
            log_dir: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}

fn hours_or(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let hours: u64 = parse_or(key, default)?;
    hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::Invalid { key, value: hours.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_settings_reject_overflow() {
        let key = "AGENCY_TEST_EXPIRY_HOURS";
        std::env::set_var(key, u64::MAX.to_string());
        let err = hours_or(key, 24).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AGENCY_TEST_EXPIRY_HOURS", .. }));

        std::env::set_var(key, "2");
        assert_eq!(hours_or(key, 24).unwrap(), Duration::from_secs(7200));

        std::env::remove_var(key);
        assert_eq!(hours_or(key, 24).unwrap(), Duration::from_secs(24 * 3600));
    }
}
