use std::collections::HashMap;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE, DEFAULT_ACADEMY_TIMEZONE, DEFAULT_LOG_LEVEL, DEFAULT_MAX_AHEAD_DAYS,
    DEFAULT_MAX_SESSIONS_PER_BATCH, DEFAULT_STORAGE_TIMEZONE, ENV_PREFIX, ENV_SEPARATOR,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub limits: GenerationLimits,
    pub scheduling: SchedulingConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

/// Safety limits applied to every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationLimits {
    /// Last day offset (from the start date) the generator examines.
    pub max_ahead_days: u32,
    /// Upper bound applied to the requested count before generation.
    pub max_sessions_per_batch: u32,
}

impl GenerationLimits {
    #[must_use]
    pub const fn new(max_ahead_days: u32, max_sessions_per_batch: u32) -> Self {
        Self {
            max_ahead_days,
            max_sessions_per_batch,
        }
    }

    /// ## Summary
    /// Clamps a requested instance count to `[0, max_sessions_per_batch]`.
    #[must_use]
    pub const fn clamp_count(&self, requested: u32) -> u32 {
        if requested > self.max_sessions_per_batch {
            self.max_sessions_per_batch
        } else {
            requested
        }
    }
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AHEAD_DAYS, DEFAULT_MAX_SESSIONS_PER_BATCH)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Academy timezone used when a stored schedule does not carry one.
    pub default_timezone: String,
    /// Timezone the persistence layer stores instants in.
    pub storage_timezone: String,
    /// Extra day names, mapped to the English weekday they stand for.
    #[serde(default)]
    pub day_aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// JSON file holding the tenant schedules to run.
    pub input_path: String,
    /// JSON file holding already persisted `(schedule_id, scheduled_at)` keys.
    pub existing_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from the optional `halaqa.toml` file and `HALAQA__*`
    /// environment variables into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds `Settings` from TOML text layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the text is not valid TOML or does not deserialize.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("limits.max_ahead_days", i64::from(DEFAULT_MAX_AHEAD_DAYS))?
            .set_default(
                "limits.max_sessions_per_batch",
                i64::from(DEFAULT_MAX_SESSIONS_PER_BATCH),
            )?
            .set_default("scheduling.default_timezone", DEFAULT_ACADEMY_TIMEZONE)?
            .set_default("scheduling.storage_timezone", DEFAULT_STORAGE_TIMEZONE)?
            .set_default("batch.input_path", "schedules.json")?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.scheduling.default_timezone.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "scheduling.default_timezone must not be empty".to_string(),
            ));
        }
        if self.scheduling.storage_timezone.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "scheduling.storage_timezone must not be empty".to_string(),
            ));
        }
        if let Some(alias) = self.scheduling.day_aliases.keys().find(|k| k.trim().is_empty()) {
            return Err(CoreError::ConfigError(format!(
                "scheduling.day_aliases contains a blank alias: {alias:?}"
            )));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::trace!(error = %err, "No .env file loaded");
    }

    Settings::load()
}

#[cfg(test)]
mod tests;
