//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Configuration is loaded once from a
//! TOML file and never mutated afterwards; the bot token can be supplied
//! through `GROUPWATCH_BOT_TOKEN` instead of the file.
//!
//! # Example
//!
//! ```no_run
//! use groupwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::{LoggingConfig, LOG_FORMATS};
use super::monitor::{MonitorConfig, NotifyConfig};
use super::telegram::{TelegramAppConfig, BOT_TOKEN_ENV, TOKEN_PLACEHOLDER};
use crate::domain::id::UserId;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    ///
    /// Defaults to `data/groupwatch.db`. A relative path loaded from a file
    /// is taken relative to that file's directory. The parent directory is
    /// created on startup.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Bot token and owner allowlist.
    pub telegram: TelegramAppConfig,

    /// Matching limits and case policy.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Alert routing.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

const MEMORY_DATABASE: &str = ":memory:";

fn default_database_path() -> String {
    "data/groupwatch.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies the `GROUPWATCH_BOT_TOKEN` override before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }
        config.telegram.bot_token = config.telegram.bot_token.trim().to_string();

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        if let Some(dir) = path.parent() {
            config.anchor_database(dir);
        }
        Ok(config)
    }

    /// Resolve a relative database path against `dir`.
    ///
    /// `:memory:` and absolute paths are left alone.
    pub fn anchor_database(&mut self, dir: &Path) {
        let database = Path::new(&self.database);
        if self.database == MEMORY_DATABASE
            || database.is_absolute()
            || dir.as_os_str().is_empty()
        {
            return;
        }
        self.database = dir.join(database).to_string_lossy().into_owned();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let token = &self.telegram.bot_token;
        if token.is_empty() {
            return Err(ConfigError::MissingField { field: "bot_token" }.into());
        }
        if token == TOKEN_PLACEHOLDER || !token.contains(':') {
            return Err(ConfigError::InvalidValue {
                field: "bot_token",
                reason: "expected the token issued by @BotFather".to_string(),
            }
            .into());
        }

        if self.telegram.owners.is_empty() {
            return Err(ConfigError::MissingField { field: "owners" }.into());
        }
        if let Some(owner) = self.telegram.owners.iter().find(|id| id.get() <= 0) {
            return Err(ConfigError::InvalidValue {
                field: "owners",
                reason: format!("{owner} is not a user ID (must be greater than 0)"),
            }
            .into());
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        if self.monitor.max_keywords == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_keywords",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.max_groups == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_groups",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.content_preview_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "content_preview_len",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("use one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Configured owners.
    #[must_use]
    pub fn owners(&self) -> &[UserId] {
        &self.telegram.owners
    }

    /// Whether `user` is a configured owner.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.telegram.owners.contains(&user)
    }

    /// Database file path.
    #[must_use]
    pub fn database_path(&self) -> &Path {
        Path::new(&self.database)
    }
}
