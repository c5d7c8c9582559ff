//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use accounts::leaderboard::MAX_LIMIT;
use accounts::window::locale_week_start;
use accounts::{CalendarZone, WindowConfig};
use chrono::Weekday;
use chrono_tz::Tz;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// HS256 secret used to verify bearer tokens.
    pub jwt_secret: String,
    /// Calendar used for leaderboard windows.
    pub windows: WindowConfig,
    /// Rows returned when a leaderboard request names no limit.
    pub default_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:classroom.db?mode=rwc` |
    /// | `SQLITE_POOL_SIZE` | Maximum pooled connections | `20` |
    /// | `JWT_SECRET` | Bearer token secret | (required) |
    /// | `LEADERBOARD_WEEK_START` | First day of the week | locale's first weekday |
    /// | `LEADERBOARD_TIME_ZONE` | IANA zone for calendar windows | host zone |
    /// | `LEADERBOARD_DEFAULT_LIMIT` | Default leaderboard rows | `50` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = var("API_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            var("SQLITE_PATH").unwrap_or_else(|| "sqlite:classroom.db?mode=rwc".to_string());

        let pool_size = match var("SQLITE_POOL_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(raw))?,
            None => 20,
        };

        let jwt_secret = var("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let week_start = match var("LEADERBOARD_WEEK_START") {
            Some(raw) => raw
                .trim()
                .parse::<Weekday>()
                .map_err(|_| ConfigError::InvalidWeekStart(raw))?,
            None => locale_week_start(),
        };

        let zone = match var("LEADERBOARD_TIME_ZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map(CalendarZone::Named)
                .map_err(|_| ConfigError::InvalidTimeZone(raw))?,
            None => CalendarZone::Local,
        };

        let default_limit = match var("LEADERBOARD_DEFAULT_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or(ConfigError::InvalidDefaultLimit(raw))?,
            None => 50,
        };

        Ok(Self {
            addr,
            database_url,
            pool_size,
            jwt_secret,
            windows: WindowConfig::new(zone, week_start),
            default_limit,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("Invalid SQLITE_POOL_SIZE: {0}")]
    InvalidPoolSize(String),

    #[error("JWT_SECRET environment variable is required")]
    MissingJwtSecret,

    #[error("Invalid LEADERBOARD_WEEK_START: {0}")]
    InvalidWeekStart(String),

    #[error("Invalid LEADERBOARD_TIME_ZONE: {0}")]
    InvalidTimeZone(String),

    #[error("LEADERBOARD_DEFAULT_LIMIT must be between 1 and 100, got {0}")]
    InvalidDefaultLimit(String),
}
