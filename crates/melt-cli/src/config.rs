//! TOML configuration for the converter.
//!
//! The configuration is read from `--config PATH` when given, otherwise from
//! `melt.toml` in the platform configuration directory:
//! - Linux: `~/.config/melt/`
//! - macOS: `~/Library/Application Support/org.melt.melt/`
//! - Windows: `%APPDATA%\melt\melt\config\`
//!
//! A missing file means built-in defaults. An explicit file that cannot be
//! read or parsed is an error; a broken file in the default location is
//! logged and ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use melt_model::ReshapeConfig;
use melt_output::WriteOptions;
use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_OUTPUT_PREFIX;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "melt";
const APP_NAME: &str = "melt";
pub const CONFIG_FILENAME: &str = "melt.toml";

/// Complete converter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeltConfig {
    pub reshape: ReshapeConfig,
    pub output: OutputSettings,
}

/// Output naming and writing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Prepended to the input file name to form the default output name.
    pub prefix: String,
    /// Write a UTF-8 byte order mark at the start of CSV output.
    pub csv_bom: bool,
    /// Number of files converted concurrently.
    pub jobs: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            csv_bom: true,
            jobs: 1,
        }
    }
}

impl OutputSettings {
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            csv_bom: self.csv_bom,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub category_column: Option<String>,
    pub aggregate_column: Option<String>,
    pub no_aggregate_column: bool,
}

/// A configuration and the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: MeltConfig,
    pub path: Option<PathBuf>,
}

impl MeltConfig {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(column) = &overrides.category_column {
            self.reshape.category_column.clone_from(column);
        }
        if overrides.no_aggregate_column {
            self.reshape.aggregate_column = None;
        } else if let Some(column) = &overrides.aggregate_column {
            self.reshape.aggregate_column = Some(column.clone());
        }
    }

    /// Serializes to TOML that [`parse_config`] reads back unchanged.
    ///
    /// A disabled aggregate column is written as `aggregate_column = ""`;
    /// leaving the key out would bring back the default on reload.
    pub fn to_toml(&self) -> Result<String> {
        let mut config = self.clone();
        if config.reshape.aggregate_column.is_none() {
            config.reshape.aggregate_column = Some(String::new());
        }
        toml::to_string_pretty(&config).context("serialize configuration")
    }
}

/// Path of `melt.toml` in the platform configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Parses configuration text.
///
/// An empty `aggregate_column` disables the aggregate column, since TOML has
/// no null value.
pub fn parse_config(text: &str) -> std::result::Result<MeltConfig, toml::de::Error> {
    let mut config: MeltConfig = toml::from_str(text)?;
    if config
        .reshape
        .aggregate_column
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        config.reshape.aggregate_column = None;
    }
    Ok(config)
}

/// Loads the configuration from `explicit` or the default location.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config =
            parse_config(&text).with_context(|| format!("parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    let Some(path) = default_config_path() else {
        tracing::warn!("could not determine config directory, using defaults");
        return Ok(LoadedConfig {
            config: MeltConfig::default(),
            path: None,
        });
    };
    Ok(load_default_location(&path))
}

fn load_default_location(path: &Path) -> LoadedConfig {
    let defaults = LoadedConfig {
        config: MeltConfig::default(),
        path: None,
    };
    match fs::read_to_string(path) {
        Ok(text) => match parse_config(&text) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                LoadedConfig {
                    config,
                    path: Some(path.to_path_buf()),
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed config file");
                defaults
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => defaults,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "could not read config file");
            defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
[reshape]
category_column = "Department"

[output]
jobs = 4
"#,
        )
        .unwrap();
        assert_eq!(config.reshape.category_column, "Department");
        assert_eq!(config.reshape.aggregate_column.as_deref(), Some("合计"));
        assert_eq!(config.output.jobs, 4);
        assert_eq!(config.output.prefix, "清洗_");
        assert!(config.output.csv_bom);
    }

    #[test]
    fn test_empty_aggregate_disables_it() {
        let config = parse_config("[reshape]\naggregate_column = \"\"\n").unwrap();
        assert_eq!(config.reshape.aggregate_column, None);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = MeltConfig::default();
        config.apply_overrides(&ConfigOverrides {
            category_column: Some("部门".to_string()),
            aggregate_column: Some("总计".to_string()),
            no_aggregate_column: false,
        });
        assert_eq!(config.reshape.category_column, "部门");
        assert_eq!(config.reshape.aggregate_column.as_deref(), Some("总计"));

        config.apply_overrides(&ConfigOverrides {
            no_aggregate_column: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.reshape.aggregate_column, None);
        assert_eq!(config.reshape.category_column, "部门");
    }

    #[test]
    fn test_disabled_aggregate_survives_round_trip() {
        let mut config = MeltConfig::default();
        config.apply_overrides(&ConfigOverrides {
            no_aggregate_column: true,
            ..ConfigOverrides::default()
        });

        let text = config.to_toml().unwrap();
        assert!(text.contains("aggregate_column = \"\""), "{text}");

        let reparsed = parse_config(&text).unwrap();
        assert_eq!(reparsed.reshape.aggregate_column, None);
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = MeltConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }
}
