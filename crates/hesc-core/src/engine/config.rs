use crate::core::io::container::FormatVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Format versions accepted when no table is configured.
pub const DEFAULT_SUPPORTED_VERSIONS: &[FormatVersion] = &[FormatVersion::new(0, 0)];

/// Upper bound on a GINFO atom count when none is configured.
pub const DEFAULT_MAX_GROUP_ATOMS: usize = i16::MAX as usize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings that control how strictly a stream is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DecodeConfig {
    pub supported_versions: Vec<FormatVersion>,
    pub strict_record_lengths: bool,
    pub max_group_atoms: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            supported_versions: DEFAULT_SUPPORTED_VERSIONS.to_vec(),
            strict_record_lengths: false,
            max_group_atoms: DEFAULT_MAX_GROUP_ATOMS,
        }
    }
}

impl DecodeConfig {
    /// Parses a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DecodeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_versions.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "supported-versions",
                reason: "at least one version must be listed".to_string(),
            });
        }
        if self.max_group_atoms == 0 || self.max_group_atoms > DEFAULT_MAX_GROUP_ATOMS {
            return Err(ConfigError::InvalidParameter {
                name: "max-group-atoms",
                reason: format!(
                    "must be between 1 and {}, got {}",
                    DEFAULT_MAX_GROUP_ATOMS, self.max_group_atoms
                ),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DecodeConfigBuilder {
    supported_versions: Option<Vec<FormatVersion>>,
    strict_record_lengths: Option<bool>,
    max_group_atoms: Option<usize>,
}

impl DecodeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supported_versions(mut self, versions: Vec<FormatVersion>) -> Self {
        self.supported_versions = Some(versions);
        self
    }
    pub fn strict_record_lengths(mut self, strict: bool) -> Self {
        self.strict_record_lengths = Some(strict);
        self
    }
    pub fn max_group_atoms(mut self, max: usize) -> Self {
        self.max_group_atoms = Some(max);
        self
    }

    pub fn build(self) -> Result<DecodeConfig, ConfigError> {
        let defaults = DecodeConfig::default();
        let config = DecodeConfig {
            supported_versions: self
                .supported_versions
                .unwrap_or(defaults.supported_versions),
            strict_record_lengths: self
                .strict_record_lengths
                .unwrap_or(defaults.strict_record_lengths),
            max_group_atoms: self.max_group_atoms.unwrap_or(defaults.max_group_atoms),
        };
        config.validate()?;
        Ok(config)
    }
}
