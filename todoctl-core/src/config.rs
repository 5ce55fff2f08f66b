//! Environment-sourced configuration.
//!
//! Environment variables (empty values count as unset):
//!   DATABASE_URL          # Full connection URL, overrides the DB_* fields
//!   DB_HOST               # default: localhost
//!   DB_PORT               # default: 5432
//!   DB_USER               # default: postgres
//!   DB_PASSWORD           # default: password
//!   DB_NAME               # default: todo_db
//!   DB_SSLMODE            # default: disable
//!   DB_MAX_CONNECTIONS    # default: 5
//!   DB_MIN_CONNECTIONS    # default: 1
//!   LOG_LEVEL             # default: info

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "password";
const DEFAULT_NAME: &str = "todo_db";

/// Kept low for a single-user desktop backend.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.todoctl/.env
///
/// dotenvy never overwrites variables that are already set, so loading the
/// current directory first gives it precedence over the home directory file.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from ~/.todoctl: {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.todoctl)");
    } else {
        let paths: Vec<String> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        info!("Loaded configuration from: {}", paths.join(", "));
    }
}

/// Get the todoctl config directory path (~/.todoctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".todoctl"))
}

/// Transport-security mode, named as libpq names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    #[default]
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }
}

impl FromStr for SslMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            _ => Err(ConfigError::invalid_value(
                "DB_SSLMODE",
                s,
                "expected one of disable, allow, prefer, require, verify-ca, verify-full",
            )),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection descriptor handed to the store at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: SslMode,
    /// Full connection URL; when set, the individual fields above are ignored
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            name: DEFAULT_NAME.to_string(),
            ssl_mode: SslMode::default(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Read the descriptor from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the descriptor through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let url = get("DATABASE_URL");

        let mut config = Self {
            url,
            max_connections: match get("DB_MAX_CONNECTIONS") {
                Some(raw) => parse_number("DB_MAX_CONNECTIONS", &raw)?,
                None => defaults.max_connections,
            },
            min_connections: match get("DB_MIN_CONNECTIONS") {
                Some(raw) => parse_number("DB_MIN_CONNECTIONS", &raw)?,
                None => defaults.min_connections,
            },
            ..defaults
        };

        // A URL carries its own host, port and TLS settings; stale DB_* values
        // must not block it.
        if config.url.is_none() {
            if let Some(host) = get("DB_HOST") {
                config.host = host;
            }
            if let Some(raw) = get("DB_PORT") {
                config.port = parse_number("DB_PORT", &raw)?;
            }
            if let Some(user) = get("DB_USER") {
                config.user = user;
            }
            if let Some(password) = get("DB_PASSWORD") {
                config.password = password;
            }
            if let Some(name) = get("DB_NAME") {
                config.name = name;
            }
            if let Some(raw) = get("DB_SSLMODE") {
                config.ssl_mode = raw.parse()?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check pool sizing.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_connections == 0 {
            return Err(ConfigError::invalid_value(
                "DB_MAX_CONNECTIONS",
                "0",
                "pool needs at least one connection",
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::invalid_value(
                "DB_MIN_CONNECTIONS",
                "0",
                "pool keeps at least one idle connection",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::PoolSize {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }
}

/// Password-redacted, so the descriptor can be logged.
impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_some() {
            return f.write_str("DATABASE_URL (redacted)");
        }
        write!(
            f,
            "postgres://{}:***@{}:{}/{}?sslmode={}",
            self.user, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

/// Application-level settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| Self::default().log_level),
        }
    }
}

fn parse_number<T: FromStr>(key: &'static str, raw: &str) -> ConfigResult<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_value(key, raw, e.to_string()))
}
