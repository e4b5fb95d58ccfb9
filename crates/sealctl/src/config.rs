//! Configuration loading and validation for `sealctl`.
//!
//! All values are read from environment variables at startup. The process
//! exits with a clear error message if any variable is invalid.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use envelope::SealerConfig;
use serde::{Deserialize, Deserializer};

use crate::key::KeyMaterial;

/// Validated `sealctl` configuration.
#[derive(Deserialize)]
pub struct Config {
    /// Cipher algorithm used by `seal` when `--algo` is not given.
    #[serde(default = "default_algo")]
    pub default_algo: String,

    /// Cipher mode used by `seal` when `--mode` is not given.
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Symmetric key, given as standard base64 in `SEAL_KEY` and decoded on
    /// load. Required by `seal` and `open` only.
    #[serde(default, deserialize_with = "deserialize_key")]
    pub seal_key: Option<KeyMaterial>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_algo() -> String {
    SealerConfig::default().algo
}
fn default_mode() -> String {
    SealerConfig::default().mode
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.default_algo, "DEFAULT_ALGO")?;
        ensure_non_empty(&self.default_mode, "DEFAULT_MODE")?;
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;
        Ok(())
    }

    /// The library configuration derived from these settings.
    pub fn sealer(&self) -> SealerConfig {
        SealerConfig::new(&self.default_algo, &self.default_mode)
    }

    /// The key from `SEAL_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable was not set.
    pub fn key(&self) -> Result<&KeyMaterial> {
        self.seal_key
            .as_ref()
            .context("SEAL_KEY is required for this command")
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("default_algo", &self.default_algo)
            .field("default_mode", &self.default_mode)
            .field("seal_key", &self.seal_key.as_ref().map(|_| "[REDACTED]"))
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn deserialize_key<'de, D>(deserializer: D) -> Result<Option<KeyMaterial>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    encoded
        .map(|s| decode_key(&s).map_err(|e| serde::de::Error::custom(format!("{e:#}"))))
        .transpose()
}

fn decode_key(encoded: &str) -> Result<KeyMaterial> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .context("SEAL_KEY must be standard base64")?;
    if bytes.is_empty() {
        anyhow::bail!("SEAL_KEY must not be empty");
    }
    Ok(KeyMaterial::new(bytes))
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}
