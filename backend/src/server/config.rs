//! Application configuration from environment variables.
//!
//! Every recognised option has a default except `JWT_SECRET`, which must be
//! provided. `from_lookup` exists so tests can inject values without
//! touching the process environment.

use std::time::Duration;

use crate::outbound::ai::{AiClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_JWT_EXPIRATION_SECONDS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("required configuration {key} is missing")]
    Missing { key: &'static str },
    #[error("configuration {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Relational store settings (`DB_*`).
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Connection URL for the pool manager.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Auth gate settings (`JWT_*`).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_seconds: i64,
}

/// HTTP surface settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub port: u16,
    pub api_prefix: String,
    pub cors_origin: String,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub ai: AiClientConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let string = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_owned())
        };

        let db = DbConfig {
            host: string("DB_HOST", "localhost"),
            port: parse(&lookup, "DB_PORT", 5432)?,
            user: string("DB_USER", "postgres"),
            password: string("DB_PASSWORD", "postgres"),
            database: string("DB_DATABASE", "saverfox"),
            pool_min: parse(&lookup, "DB_POOL_MIN", 2)?,
            pool_max: parse(&lookup, "DB_POOL_MAX", 10)?,
            idle_timeout: Duration::from_secs(parse(&lookup, "DB_IDLE_TIMEOUT", 600)?),
            connect_timeout: Duration::from_secs(parse(&lookup, "DB_CONNECT_TIMEOUT", 30)?),
        };

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").ok_or(ConfigError::Missing { key: "JWT_SECRET" })?,
            expiration_seconds: parse(&lookup, "JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION_SECONDS)?,
        };

        let mut ai = AiClientConfig::new(string("AI_SERVICE_URL", "http://localhost:8000"));
        ai.timeout =
            Duration::from_secs(parse(&lookup, "AI_SERVICE_TIMEOUT", DEFAULT_TIMEOUT.as_secs())?);
        ai.max_retries = parse(&lookup, "AI_SERVICE_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        ai.retry_delay = Duration::from_secs(parse(
            &lookup,
            "AI_SERVICE_RETRY_DELAY",
            DEFAULT_RETRY_DELAY.as_secs(),
        )?);

        let http = HttpConfig {
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            api_prefix: string("API_PREFIX", DEFAULT_API_PREFIX),
            cors_origin: string("CORS_ORIGIN", "*"),
        };

        Ok(Self { db, jwt, ai, http })
    }
}

fn parse<L, T>(lookup: &L, key: &'static str, default: T) -> Result<T, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|value| (*value).to_owned())
    }

    #[rstest]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).expect("valid");

        assert_eq!(config.http.port, DEFAULT_PORT);
        assert_eq!(config.http.api_prefix, "/api");
        assert_eq!(config.db.pool_max, 10);
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.ai.timeout, Duration::from_secs(30));
        assert_eq!(config.jwt.expiration_seconds, 86_400);
    }

    #[rstest]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).expect_err("missing");
        assert_eq!(err, ConfigError::Missing { key: "JWT_SECRET" });
    }

    #[rstest]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8081"),
            ("DB_POOL_MAX", "25"),
            ("AI_SERVICE_RETRY_DELAY", "2"),
            ("API_PREFIX", "/v1"),
        ]))
        .expect("valid");

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.db.pool_max, 25);
        assert_eq!(config.ai.retry_delay, Duration::from_secs(2));
        assert_eq!(config.http.api_prefix, "/v1");
    }

    #[rstest]
    fn malformed_numbers_are_rejected_with_the_key() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DB_PORT", "not-a-port"),
        ]))
        .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid { key: "DB_PORT", .. }));
    }

    #[rstest]
    fn database_url_is_assembled_from_parts() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DB_HOST", "db.internal"),
            ("DB_USER", "game"),
            ("DB_PASSWORD", "pw"),
            ("DB_DATABASE", "game"),
        ]))
        .expect("valid");
        assert_eq!(config.db.url(), "postgres://game:pw@db.internal:5432/game");
    }
}
