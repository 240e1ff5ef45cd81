//! Configuration management for atop-utilization.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context, Result};
use atop_utilization::SchemaRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat, LogLevel, OutputFormat};

pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_OUTPUT_FORMAT: &str = "text";

/// Config file locations tried when no path is given.
const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/atop-utilization/config.yaml",
    "/etc/atop-utilization/config.yml",
    "/etc/atop-utilization/config.json",
    "./atop-utilization.yaml",
    "./atop-utilization.yml",
    "./atop-utilization.json",
];

/// Enhanced configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Logging
    pub log_level: Option<String>,

    // Decoding
    /// Rayon threads used for decoding (0 or unset = auto)
    pub parallelism: Option<usize>,

    // Reporting
    /// "text" | "json"
    #[serde(alias = "output-format")]
    pub output_format: Option<String>,
    /// Always print the detected MEM layout
    pub debug: Option<bool>,

    // MEM column detection
    #[serde(default)]
    pub schema: SchemaRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            parallelism: None,
            output_format: Some(DEFAULT_OUTPUT_FORMAT.into()),
            debug: Some(false),
            schema: SchemaRules::default(),
        }
    }
}

impl Config {
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::from_name)
            .unwrap_or(LogLevel::Warn)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
            .as_deref()
            .and_then(OutputFormat::from_name)
            .unwrap_or(OutputFormat::Text)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_name(level).is_none() {
            bail!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            );
        }
    }

    if let Some(format) = cfg.output_format.as_deref() {
        if OutputFormat::from_name(format).is_none() {
            bail!("Invalid output_format '{}', expected 'text' or 'json'", format);
        }
    }

    let rules = &cfg.schema;
    if rules.page_sizes.is_empty() {
        bail!("schema.page_sizes must contain at least one page size");
    }
    if let Some(size) = rules
        .page_sizes
        .iter()
        .find(|&&size| size <= 0 || size % 1024 != 0)
    {
        bail!(
            "schema.page_sizes entry {} is not a positive multiple of 1024",
            size
        );
    }
    if rules.scan_limit == 0 {
        bail!("schema.scan_limit must be greater than 0");
    }
    if rules.availability_column > rules.availability_threshold {
        bail!(
            "schema.availability_column ({}) must not exceed schema.availability_threshold ({}); \
             records just over the threshold would never reach it",
            rules.availability_column,
            rules.availability_threshold
        );
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }
    if let Some(format) = args.report_format {
        config.output_format = Some(format!("{:?}", format).to_lowercase());
    }
    if let Some(threads) = args.parallelism {
        config.parallelism = Some(threads);
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&content, path.extension().and_then(|s| s.to_str()))
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config text; the extension selects JSON or TOML, anything else is YAML.
pub fn parse_config(content: &str, extension: Option<&str>) -> Result<Config> {
    let config = match extension {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Renders a config in the requested format.
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
