use crate::metadata::KeyVariant;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application configuration loaded from jetton-codec.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub codec: CodecConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Metadata key layout used when `--keys` is not given
    pub key_variant: KeyVariant,
    /// Append a CRC32C to emitted BOCs
    pub boc_crc32c: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            key_variant: KeyVariant::HashedKey,
            boc_crc32c: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format '{}', expected text or json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from jetton-codec.toml and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("jetton-codec")
    }

    /// Load with an explicit config file stem (extension is detected)
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Config::builder()
            // Start with default values
            .set_default("codec.key_variant", defaults.codec.key_variant.to_string())?
            .set_default("codec.boc_crc32c", defaults.codec.boc_crc32c)?
            .set_default("output.format", defaults.output.format.to_string())?
            // Load from jetton-codec.toml if it exists
            .add_source(File::with_name(file_stem).required(false))
            // JETTON_CODEC_CODEC__KEY_VARIANT=full, JETTON_CODEC_OUTPUT__FORMAT=json
            .add_source(
                Environment::with_prefix("JETTON_CODEC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get config values for CLI argument defaults, falling back to built-in
    /// defaults when the file or environment is unusable
    pub fn get_defaults() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid configuration: {}", e);
                Self::default()
            }
        }
    }
}
