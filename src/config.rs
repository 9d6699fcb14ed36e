//! Layered client configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `~/.config/taskpilot/config.toml`
//! 3. `.taskpilot/config.toml` in the working directory
//! 4. `TASKPILOT_*` environment variables, with `__` separating sections
//!    (`TASKPILOT_API__BASE_URL` sets `api.base_url`)

use crate::api::{
    CredentialStoreError, FileCredentialStore, ReqwestTransport, RetryPolicy, TransportError,
};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Project-local configuration file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".taskpilot/config.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "TASKPILOT_";

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the schema.
    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    /// A value was readable but unusable.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted key of the offending value.
        field: &'static str,
        /// Why the value was refused.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No credential location could be determined.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the work API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Login retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRetryConfig {
    /// Total login attempts, including the first.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for LoginRetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Credential storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Token file; defaults to `<config dir>/taskpilot/credentials`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPilotConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Login retry settings.
    #[serde(default)]
    pub login_retry: LoginRetryConfig,
    /// Credential storage settings.
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_owned()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_attempts() -> u32 {
    RetryPolicy::DEFAULT_LOGIN_ATTEMPTS
}

const fn default_delay_ms() -> u64 {
    2_000
}

impl TaskPilotConfig {
    /// Loads and validates configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed and
    /// [`ConfigError::InvalidValue`] when a value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(&Self::figment())
    }

    /// Extracts and validates configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the standard provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with(
            Self::global_config_path().as_deref(),
            Path::new(PROJECT_CONFIG_PATH),
        )
    }

    /// Builds the provider chain from explicit file locations. Missing files
    /// are skipped.
    #[must_use]
    pub fn figment_with(global: Option<&Path>, project: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = global.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskpilot").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|err| ConfigError::InvalidValue {
            field: "api.base_url",
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Returns the login retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.login_retry.attempts,
            Duration::from_millis(self.login_retry.delay_ms),
        )
    }

    /// Builds the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn transport(&self) -> Result<ReqwestTransport, ConfigError> {
        Ok(ReqwestTransport::new(
            self.api.base_url.as_str(),
            Duration::from_secs(self.api.timeout_secs),
        )?)
    }

    /// Returns the file credential store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Credentials`] when no path is configured and
    /// the platform has no configuration directory.
    pub fn credential_store(&self) -> Result<FileCredentialStore, ConfigError> {
        self.credentials.path.as_ref().map_or_else(
            || FileCredentialStore::default_location().map_err(ConfigError::from),
            |path| Ok(FileCredentialStore::new(path)),
        )
    }
}
