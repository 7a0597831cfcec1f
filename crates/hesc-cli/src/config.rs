use crate::cli::DecodeOptions;
use crate::error::{CliError, Result};
use hesc::core::io::container::FormatVersion;
use hesc::engine::config::{DecodeConfig, DecodeConfigBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Decoder settings as read from a TOML file, before CLI overrides are applied.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDecodeConfig {
    pub supported_versions: Option<Vec<FormatVersion>>,
    pub strict_record_lengths: Option<bool>,
    pub max_group_atoms: Option<usize>,
}

impl PartialDecodeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies `--strict` and `-S KEY=VALUE` overrides and builds a validated config.
    pub fn merge_with_cli(mut self, options: &DecodeOptions) -> Result<DecodeConfig> {
        self.apply_set_values(&options.set_values)?;
        if options.strict {
            self.strict_record_lengths = Some(true);
        }

        let mut builder = DecodeConfigBuilder::new();
        if let Some(versions) = self.supported_versions {
            builder = builder.supported_versions(versions);
        }
        if let Some(strict) = self.strict_record_lengths {
            builder = builder.strict_record_lengths(strict);
        }
        if let Some(max) = self.max_group_atoms {
            builder = builder.max_group_atoms(max);
        }
        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for s in set_values {
            let (key, value) = s.split_once('=').ok_or_else(|| {
                CliError::Config(format!("Invalid format for --set: '{}'. Expected KEY=VALUE.", s))
            })?;

            match key.trim() {
                "supported-versions" => {
                    let versions = value
                        .split(',')
                        .filter(|v| !v.trim().is_empty())
                        .map(|v| v.parse::<FormatVersion>())
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|e| CliError::Config(e.to_string()))?;
                    self.supported_versions = Some(versions);
                }
                "strict-record-lengths" => {
                    self.strict_record_lengths = Some(value.trim().parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean for strict-record-lengths: '{}'",
                            value
                        ))
                    })?);
                }
                "max-group-atoms" => {
                    self.max_group_atoms = Some(value.trim().parse().map_err(|_| {
                        CliError::Config(format!("Invalid integer for max-group-atoms: '{}'", value))
                    })?);
                }
                other => {
                    return Err(CliError::Config(format!(
                        "Unknown configuration key: '{}'",
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Loads the optional config file and layers the command-line options on top.
pub fn resolve(options: &DecodeOptions) -> Result<DecodeConfig> {
    let partial = match &options.config {
        Some(path) => PartialDecodeConfig::from_file(path)?,
        None => PartialDecodeConfig::default(),
    };
    partial.merge_with_cli(options)
}
