// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `BLOG_JWT_SECRET`
pub const ENV_PREFIX: &str = "BLOG_";

/// Default session lifetime (1 hour)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// scrypt cost used when none is configured
pub const DEFAULT_PASSWORD_HASH_LOG_N: u8 = 15;

/// Shortest accepted HMAC signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Log level
    pub log_level: String,
    /// Session token and cookie lifetime in seconds
    pub session_ttl_secs: u64,
    /// HMAC secret used to sign session tokens
    pub jwt_secret: String,
    /// scrypt work factor (log2 of N)
    pub password_hash_log_n: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: PathBuf::from("blog.db"),
            log_level: "info".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            jwt_secret: String::new(),
            password_hash_log_n: DEFAULT_PASSWORD_HASH_LOG_N,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` and `BLOG_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment().merge(Toml::file("config.toml")))
    }

    /// Load settings from an explicit TOML file, still honouring the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        Self::from_figment(Self::figment().merge(Toml::file(path)))
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        // Environment always wins over files
        let settings: Settings = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log level: {}", self.log_level);
        }
        if self.session_ttl_secs == 0 {
            bail!("session_ttl_secs must be greater than zero");
        }
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            bail!("jwt_secret must be at least {MIN_SECRET_LENGTH} bytes");
        }
        if !(1..=20).contains(&self.password_hash_log_n) {
            bail!("password_hash_log_n must be between 1 and 20");
        }
        Ok(())
    }
}
