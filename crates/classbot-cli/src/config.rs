//! Runtime configuration.
//!
//! Settings come from `config/default.toml` (optional), then `CLASSBOT_*`
//! environment variables (a `.env` file is loaded first), then command-line
//! flags.  Every field has a default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub secure_cookie: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 5000,
            secure_cookie: false,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub questions_file: PathBuf,
    pub users_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            questions_file: "questions.json".into(),
            users_file: "users.json".into(),
        }
    }
}

/// Longest accepted session lifetime (ten years).
pub const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// `[session]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
    pub cookie_name: String,
    pub max_sessions: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 86_400,
            cookie_name: "classbot_session".into(),
            max_sessions: 10_000,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.max(1))
    }
}

/// `[auth]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub pbkdf2_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: classbot_store::password::DEFAULT_ITERATIONS,
        }
    }
}

impl AppConfig {
    /// Load `path` (if it exists) and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.session.ttl_seconds > MAX_TTL_SECONDS {
            bail!(
                "session.ttl_seconds = {} exceeds the maximum of {MAX_TTL_SECONDS}",
                self.session.ttl_seconds
            );
        }
        Ok(())
    }

    /// Parse a TOML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        toml::from_str(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Override fields from `CLASSBOT_*` variables as returned by `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = var("CLASSBOT_BIND") {
            self.server.bind = bind;
        }
        if let Some(port) = var("CLASSBOT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("CLASSBOT_PORT is not a port number: {port}"))?;
        }
        if let Some(path) = var("CLASSBOT_QUESTIONS_FILE") {
            self.storage.questions_file = path.into();
        }
        if let Some(path) = var("CLASSBOT_USERS_FILE") {
            self.storage.users_file = path.into();
        }
        if let Some(ttl) = var("CLASSBOT_SESSION_TTL") {
            self.session.ttl_seconds = ttl
                .parse()
                .with_context(|| format!("CLASSBOT_SESSION_TTL is not a number: {ttl}"))?;
        }
        Ok(())
    }
}
