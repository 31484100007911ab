//! Application configuration from the environment
//!
//! Environment variables:
//!   DATABASE_URL                      # Full connection string, or the DB_* set below
//!   DB_HOST / DB_PORT / DB_USER / DB_PASSWORD / DB_NAME
//!   SESSION_SECRET                    # Cookie signing secret (>= 32 bytes)
//!   ENCRYPTION_KEY                    # base64 of 32 bytes, see `worklog keygen`
//!   OPENAI_API_KEY                    # Optional; summaries disabled without it
//!   OPENAI_MODEL                      # default: gpt-4
//!   OPENAI_BASE_URL                   # default: https://api.openai.com/v1
//!   SESSION_TTL_HOURS                 # default: 336 (14 days)
//!   SESSION_COOKIE_SECURE             # default: false
//!   STATIC_DIR                        # default: static

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::crypto::FieldCipher;

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_SESSION_TTL_HOURS: u64 = 24 * 14;
const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;
const MIN_SESSION_SECRET_LEN: usize = 32;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Chat-completion endpoint settings
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Everything the server and CLI need from the environment
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    pub encryption_key: String,
    pub openai: Option<OpenAiConfig>,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub static_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai", &self.openai)
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}

/// Load `./.env` if present. Variables already set are not overwritten.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded configuration from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found, using environment only"),
        Err(e) => tracing::warn!(error = %e, "Failed to parse .env file"),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_empty(lookup(name));

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&get)?,
        };

        let session_secret =
            get("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
            });
        }

        let encryption_key =
            get("ENCRYPTION_KEY").ok_or(ConfigError::Missing("ENCRYPTION_KEY"))?;
        FieldCipher::from_base64_key(&encryption_key).map_err(|e| ConfigError::Invalid {
            name: "ENCRYPTION_KEY",
            reason: e.to_string(),
        })?;

        let openai = get("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        });

        let ttl_hours = match get("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|h| (1..=MAX_SESSION_TTL_HOURS).contains(h))
                .ok_or_else(|| ConfigError::Invalid {
                    name: "SESSION_TTL_HOURS",
                    reason: format!(
                        "expected between 1 and {} hours, got '{}'",
                        MAX_SESSION_TTL_HOURS, raw
                    ),
                })?,
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        let cookie_secure = match get("SESSION_COOKIE_SECURE") {
            Some(raw) => parse_bool("SESSION_COOKIE_SECURE", &raw)?,
            None => false,
        };

        let static_dir = get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        Ok(Self {
            database_url,
            session_secret,
            encryption_key,
            openai,
            session_ttl: Duration::from_secs(ttl_hours * 3600),
            cookie_secure,
            static_dir,
        })
    }

    /// The field cipher for this configuration's key.
    pub fn cipher(&self) -> Result<FieldCipher, ConfigError> {
        FieldCipher::from_base64_key(&self.encryption_key).map_err(|e| ConfigError::Invalid {
            name: "ENCRYPTION_KEY",
            reason: e.to_string(),
        })
    }
}

fn database_url_from_parts<G>(get: &G) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let host = get("DB_HOST").ok_or(ConfigError::Missing("DATABASE_URL or DB_HOST"))?;
    let user = get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
    let name = get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
    let port = match get("DB_PORT") {
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "DB_PORT",
            reason: format!("expected a port number, got '{}'", raw),
        })?,
        None => DEFAULT_DB_PORT,
    };

    let user = urlencoding::encode(&user);
    let credentials = match get("DB_PASSWORD") {
        Some(password) => format!("{}:{}", user, urlencoding::encode(&password)),
        None => user.into_owned(),
    };

    Ok(format!("postgres://{}@{}:{}/{}", credentials, host, port, name))
}
