use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::InputFormat;
use crate::utils::file::{expand_path, read_optional};

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_OUTPUT_INCLUDE_ATTRIBUTES,
    DEFAULT_OUTPUT_INCLUDE_RAW, DEFAULT_OUTPUT_PRETTY,
};

// =============================================================================
// File Config
// =============================================================================

/// Output configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputFileConfig {
    pub pretty: Option<bool>,
    pub include_raw: Option<bool>,
    pub include_attributes: Option<bool>,
}

/// Input configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InputFileConfig {
    pub format: Option<InputFormat>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub output: Option<OutputFileConfig>,
    pub input: Option<InputFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file. A missing file is `Ok(None)`.
    fn load_from_file(path: &Path) -> Result<Option<Self>> {
        let Some(content) = read_optional(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?
        else {
            tracing::trace!(path = %path.display(), "Config file not present");
            return Ok(None);
        };
        tracing::debug!(path = %path.display(), "Loading config file");
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(Some(config))
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(output) = other.output {
            let current = self.output.get_or_insert_with(OutputFileConfig::default);
            if output.pretty.is_some() {
                tracing::trace!(pretty = ?output.pretty, "Merging output.pretty");
                current.pretty = output.pretty;
            }
            if output.include_raw.is_some() {
                tracing::trace!(include_raw = ?output.include_raw, "Merging output.include_raw");
                current.include_raw = output.include_raw;
            }
            if output.include_attributes.is_some() {
                tracing::trace!(
                    include_attributes = ?output.include_attributes,
                    "Merging output.include_attributes"
                );
                current.include_attributes = output.include_attributes;
            }
        }

        if let Some(input) = other.input {
            let current = self.input.get_or_insert_with(InputFileConfig::default);
            if input.format.is_some() {
                tracing::trace!(format = ?input.format, "Merging input.format");
                current.format = input.format;
            }
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// How normalized spans are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub pretty: bool,
    /// When false, every span's `raw` field is blanked
    pub include_raw: bool,
    /// When false, every span's `attributes` field is dropped
    pub include_attributes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub format: InputFormat,
}

/// Final merged application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.traceprism/traceprism.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_layered(
            cli,
            get_profile_config_path().as_deref(),
            Path::new(CONFIG_FILE_NAME),
        )
    }

    fn load_layered(cli: &CliConfig, profile_path: Option<&Path>, local_path: &Path) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir - skip if not exists
        if let Some(profile_path) = profile_path
            && let Some(profile_config) = FileConfig::load_from_file(profile_path)?
        {
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            match FileConfig::load_from_file(&expanded)? {
                Some(config) => Some((expanded, config)),
                None => anyhow::bail!("Config file not found: {}", expanded.display()),
            }
        } else {
            FileConfig::load_from_file(local_path)?.map(|config| (local_path.to_path_buf(), config))
        };

        if let Some((path, overlay_config)) = overlay {
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Layer: defaults -> file config -> CLI/env overrides
        let file_output = file_config.output.unwrap_or_default();
        let file_input = file_config.input.unwrap_or_default();

        let pretty = if cli.compact {
            false
        } else {
            file_output.pretty.unwrap_or(DEFAULT_OUTPUT_PRETTY)
        };

        let config = Self {
            output: OutputConfig {
                pretty,
                include_raw: file_output
                    .include_raw
                    .unwrap_or(DEFAULT_OUTPUT_INCLUDE_RAW),
                include_attributes: file_output
                    .include_attributes
                    .unwrap_or(DEFAULT_OUTPUT_INCLUDE_ATTRIBUTES),
            },
            input: InputConfig {
                format: cli.format.or(file_input.format).unwrap_or_default(),
            },
        };

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }
}

/// Get the profile config path (~/.traceprism/traceprism.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
