//! Gate configuration
//!
//! All recognized options live in [`GateConfig`]. It is built once at startup,
//! usually from `GATE_*` environment variables, and validated before any key
//! is derived or any store connection is opened.

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_COOKIE_NAME: &str = "aars";
pub const DEFAULT_COOKIE_EXPIRE_SECONDS: u64 = 3600;
pub const DEFAULT_STORE_ADDRESS: &str = "127.0.0.1:6379";
pub const DEFAULT_STORE_POOL_SIZE: usize = 10;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TITLE: &str = "AARS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Secret file error: {0}")]
    SecretFile(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Redis,
}

impl std::str::FromStr for StoreType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreType::Memory),
            "redis" => Ok(StoreType::Redis),
            other => Err(ConfigError::Invalid {
                key: "GATE_STORE_TYPE",
                reason: format!(
                    "unsupported store type '{other}', supported types are 'memory' and 'redis'"
                ),
            }),
        }
    }
}

/// Connection settings for the shared session store
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub store_type: StoreType,
    /// `host:port`, or a full `redis://` URL
    pub address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db_index: i64,
    /// Upper bound on pooled connections
    pub pool_size: usize,
    /// Bound on every store round-trip, including the wait for a pooled connection
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Redis,
            address: DEFAULT_STORE_ADDRESS.to_string(),
            username: None,
            password: None,
            db_index: 0,
            pool_size: DEFAULT_STORE_POOL_SIZE,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_type", &self.store_type)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db_index", &self.db_index)
            .field("pool_size", &self.pool_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for looking up the display title from a video's metadata
#[derive(Clone, PartialEq, Eq)]
pub struct TitleLookupConfig {
    pub api_key: String,
    pub video_id: String,
}

impl fmt::Debug for TitleLookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleLookupConfig")
            .field("api_key", &"<redacted>")
            .field("video_id", &self.video_id)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub signing_secret: String,
    /// When unset, cookies are signed but not encrypted
    pub encryption_secret: Option<String>,
    pub cookie_name: String,
    pub cookie_domain: Option<String>,
    pub cookie_expire_seconds: u64,
    /// Disable only for non-TLS development deployments
    pub cookie_secure: bool,
    pub store: StoreConfig,
    pub redirect_url: String,
    pub title: String,
    pub title_lookup: Option<TitleLookupConfig>,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("signing_secret", &"<redacted>")
            .field(
                "encryption_secret",
                &self.encryption_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_expire_seconds", &self.cookie_expire_seconds)
            .field("cookie_secure", &self.cookie_secure)
            .field("store", &self.store)
            .field("redirect_url", &self.redirect_url)
            .field("title", &self.title)
            .field("title_lookup", &self.title_lookup)
            .finish()
    }
}

impl GateConfig {
    /// Creates a configuration with defaults for everything but the two
    /// settings that have no sensible default.
    pub fn new(signing_secret: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            encryption_secret: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_domain: None,
            cookie_expire_seconds: DEFAULT_COOKIE_EXPIRE_SECONDS,
            cookie_secure: true,
            store: StoreConfig::default(),
            redirect_url: redirect_url.into(),
            title: DEFAULT_TITLE.to_string(),
            title_lookup: None,
        }
    }

    /// Reads the configuration from `GATE_*` environment variables and validates it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup and validates it.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signing_secret =
            get("GATE_SIGNING_SECRET").ok_or(ConfigError::Missing("GATE_SIGNING_SECRET"))?;
        let redirect_url =
            get("GATE_REDIRECT_URL").ok_or(ConfigError::Missing("GATE_REDIRECT_URL"))?;

        let mut config = Self::new(signing_secret, redirect_url);
        config.encryption_secret = get("GATE_ENCRYPTION_SECRET");
        if let Some(name) = get("GATE_COOKIE_NAME") {
            config.cookie_name = name;
        }
        config.cookie_domain = get("GATE_COOKIE_DOMAIN");
        if let Some(v) = get("GATE_COOKIE_EXPIRE") {
            config.cookie_expire_seconds = parse_number("GATE_COOKIE_EXPIRE", &v)?;
        }
        if let Some(v) = get("GATE_COOKIE_SECURE") {
            config.cookie_secure = parse_bool("GATE_COOKIE_SECURE", &v)?;
        }

        if let Some(v) = get("GATE_STORE_TYPE") {
            config.store.store_type = v.parse()?;
        }
        if let Some(address) = get("GATE_STORE_ADDRESS") {
            config.store.address = address;
        }
        config.store.username = get("GATE_STORE_USERNAME");
        config.store.password = get("GATE_STORE_PASSWORD");
        if let Some(v) = get("GATE_STORE_DB") {
            config.store.db_index = parse_number("GATE_STORE_DB", &v)?;
        }
        if let Some(v) = get("GATE_STORE_POOL_SIZE") {
            config.store.pool_size = parse_number("GATE_STORE_POOL_SIZE", &v)?;
        }
        if let Some(v) = get("GATE_STORE_TIMEOUT_SECS") {
            config.store.timeout =
                Duration::from_secs(parse_number("GATE_STORE_TIMEOUT_SECS", &v)?);
        }

        if let Some(title) = get("GATE_TITLE") {
            config.title = title;
        }
        let api_key = match (get("GATE_TITLE_API_KEY"), get("GATE_TITLE_API_KEY_FILE")) {
            (Some(key), _) => Some(key),
            (None, Some(path)) => Some(load_secret_file(&path)?),
            (None, None) => None,
        };
        // The lookup is only active when both halves are present
        if let (Some(api_key), Some(video_id)) = (api_key, get("GATE_TITLE_VIDEO_ID")) {
            config.title_lookup = Some(TitleLookupConfig { api_key, video_id });
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.is_empty() {
            return Err(ConfigError::Missing("GATE_SIGNING_SECRET"));
        }
        if self
            .encryption_secret
            .as_ref()
            .is_some_and(|secret| secret.is_empty())
        {
            return Err(ConfigError::Invalid {
                key: "GATE_ENCRYPTION_SECRET",
                reason: "must not be empty when set".to_string(),
            });
        }
        if self.redirect_url.is_empty() {
            return Err(ConfigError::Missing("GATE_REDIRECT_URL"));
        }
        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-_.".contains(&b))
        {
            return Err(ConfigError::Invalid {
                key: "GATE_COOKIE_NAME",
                reason: format!("'{}' is not a valid cookie name", self.cookie_name),
            });
        }
        if self.store.pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "GATE_STORE_POOL_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.store.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "GATE_STORE_TIMEOUT_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.store.store_type == StoreType::Redis && self.store.address.is_empty() {
            return Err(ConfigError::Missing("GATE_STORE_ADDRESS"));
        }
        if self.store.db_index < 0 {
            return Err(ConfigError::Invalid {
                key: "GATE_STORE_DB",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}

/// Reads a secret file that must contain exactly one non-empty line.
pub fn load_secret_file(path: impl AsRef<Path>) -> Result<String, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::SecretFile(format!("can not read {}: {e}", path.display())))?;
    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    match lines.as_slice() {
        [secret] => Ok((*secret).to_string()),
        _ => Err(ConfigError::SecretFile(format!(
            "{} must contain exactly one secret, found {}",
            path.display(),
            lines.len()
        ))),
    }
}
