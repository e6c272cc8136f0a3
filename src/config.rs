/*
 * Responsibility
 * - load settings from the environment (.env supported)
 * - validate them up front so a bad deployment fails at startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,

    pub cache_url: String,
    // Store-level expiry for cached responses. The pipeline itself never expires entries.
    pub cache_ttl: Option<Duration>,

    // Upper bound for a single cache GET/SET/DEL.
    pub cache_timeout: Duration,
    // Upper bound for a single token store lookup.
    pub token_lookup_timeout: Duration,

    pub request_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match std::env::var("APP_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("APP_PORT"))?,
            Err(_) => 8080,
        };

        let addr = SocketAddr::from_str(&format!("{}:{}", host, port))
            .map_err(|_| ConfigError::Invalid("APP_HOST"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let cache_url = std::env::var("CACHE_URL")
            .unwrap_or_else(|_| "redis://localhost:6379/0".to_string());

        let cache_ttl = std::env::var("CACHE_TTL_SECONDS")
            .ok()
            .map(|v| v.parse::<u64>().map_err(|_| ConfigError::Invalid("CACHE_TTL_SECONDS")))
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let cache_timeout = millis_or("CACHE_TIMEOUT_MS", 50)?;
        let token_lookup_timeout = millis_or("TOKEN_LOOKUP_TIMEOUT_MS", 50)?;

        let request_timeout =
            Duration::from_secs(positive_or("REQUEST_TIMEOUT_SECONDS", 30_u64)?);
        let request_body_limit = positive_or("REQUEST_BODY_LIMIT_BYTES", 1024 * 1024_usize)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            cache_url,
            cache_ttl,
            cache_timeout,
            token_lookup_timeout,
            request_timeout,
            request_body_limit,
        })
    }
}

fn millis_or(key: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    positive_or(key, default_ms).map(Duration::from_millis)
}

// Unset falls back to `default`; set but unparsable or zero is an error
// (a zero timeout or body limit would reject every request).
fn positive_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match std::env::var(key) {
        Ok(raw) => parse_positive(&raw).ok_or(ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn parse_positive<T>(raw: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    raw.trim().parse::<T>().ok().filter(|v| *v > T::default())
}
