use std::{path::PathBuf, time::Duration};

use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use secrecy::Secret;
use serde::Deserialize;
use tether_core::AppError;

use super::constants::{CONFIG_FILE, ENV_PREFIX, ENV_SEPARATOR, defaults};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub session: SessionSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    pub request_timeout_ms: u64,
}

impl ProviderSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub refresh_threshold_secs: u64,
    pub store_name: String,
}

impl SessionSettings {
    pub fn refresh_threshold(&self) -> Duration {
        Duration::from_secs(self.refresh_threshold_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub directory: PathBuf,
}

impl Settings {
    /// Read `.env`, the optional settings file and `TETHER_*` variables, in
    /// increasing precedence.
    pub fn load() -> Result<Self, AppError> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                tracing::warn!(%error, "Ignoring unreadable .env file");
            }
        }

        let builder = Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Builder preloaded with every default; `provider.base_url` and
    /// `provider.api_key` still have to come from a source.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Config::builder()
            .set_default("provider.request_timeout_ms", defaults::REQUEST_TIMEOUT_MS)
            .and_then(|builder| {
                builder.set_default(
                    "session.refresh_threshold_secs",
                    defaults::REFRESH_THRESHOLD_SECS,
                )
            })
            .and_then(|builder| builder.set_default("session.store_name", defaults::STORE_NAME))
            .and_then(|builder| {
                builder.set_default("storage.directory", defaults::STORAGE_DIRECTORY)
            })
            .map_err(invalid_configuration)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(invalid_configuration)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(AppError::validation(
                "Provider base URL must not be empty",
                "provider.base_url",
            ));
        }
        if self.provider.request_timeout_ms == 0 {
            return Err(AppError::validation(
                "Request timeout must be greater than zero",
                "provider.request_timeout_ms",
            ));
        }
        if self.session.store_name.trim().is_empty() {
            return Err(AppError::validation(
                "Store name must not be empty",
                "session.store_name",
            ));
        }
        Ok(())
    }
}

fn invalid_configuration(error: ConfigError) -> AppError {
    AppError::Validation {
        message: format!("Invalid configuration: {error}"),
        field: None,
    }
}
