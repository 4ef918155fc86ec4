use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Xenowatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the session cookie issued on login.
pub const SESSION_COOKIE: &str = "xw.sid";

/// One day, the default session lifetime and cookie Max-Age.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

const ENV_BIND: &str = "XENOWATCH_BIND";
const ENV_DB_PATH: &str = "XENOWATCH_DB_PATH";
const ENV_MODE: &str = "XENOWATCH_ENV";
const ENV_SEED: &str = "XENOWATCH_SEED";
const ENV_STATIC_DIR: &str = "XENOWATCH_STATIC_DIR";
const ENV_SESSION_TTL: &str = "XENOWATCH_SESSION_TTL_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "xenowatch_lib=info,tower_http=info"
}

/// Get the application data directory
/// Falls back to the working directory when the platform has no data dir.
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("xenowatch.db")
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Production mode marks the session cookie `Secure`.
    pub production: bool,
    pub seed_demo_data: bool,
    pub static_dir: Option<PathBuf>,
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            db_path: default_db_path(),
            production: false,
            seed_demo_data: false,
            static_dir: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup (testable without
    /// touching the process environment).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_raw = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: ENV_BIND,
                value: bind_raw.clone(),
            })?;

        let db_path = lookup(ENV_DB_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let production = lookup(ENV_MODE)
            .map(|m| m.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let seed_demo_data = match lookup(ENV_SEED) {
            Some(raw) => parse_flag(ENV_SEED, &raw)?,
            None => false,
        };

        let static_dir = lookup(ENV_STATIC_DIR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let session_ttl = match lookup(ENV_SESSION_TTL) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or(ConfigError::InvalidValue {
                        var: ENV_SESSION_TTL,
                        value: raw.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => defaults.session_ttl,
        };

        Ok(Self {
            bind_addr,
            db_path,
            production,
            seed_demo_data,
            static_dir,
            session_ttl,
        })
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}
