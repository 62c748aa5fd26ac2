//! Configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration for the scribe binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Replay input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Export output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Attachment polling settings.
    #[serde(default)]
    pub attach: AttachSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the capture replay comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the JSONL batch file.
    #[serde(default = "default_input_path")]
    pub path: String,
}

/// Where and how exports are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the simple CSV export.
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Field delimiter for CSV output.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether to prepend a UTF-8 BOM for spreadsheet applications.
    #[serde(default = "default_bom")]
    pub bom: bool,

    /// The originating session's address, recorded in the workbook's
    /// `Session` sheet. When set, the workbook sheets are written next
    /// to the CSV.
    #[serde(default)]
    pub session_url: Option<String>,
}

/// Attachment polling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachSettings {
    /// Milliseconds between readiness polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Attempts allowed for the initial search.
    #[serde(default = "default_initial_attempts")]
    pub initial_attempts: u32,

    /// Attempts allowed when searching again after a teardown.
    #[serde(default = "default_reattach_attempts")]
    pub reattach_attempts: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "scribe_engine=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_input_path() -> String {
    "capture.jsonl".to_string()
}

fn default_output_path() -> String {
    "chat.csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_bom() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_initial_attempts() -> u32 {
    60
}

fn default_reattach_attempts() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            delimiter: default_delimiter(),
            bom: default_bom(),
            session_url: None,
        }
    }
}

impl Default for AttachSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            initial_attempts: default_initial_attempts(),
            reattach_attempts: default_reattach_attempts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `SCRIBE_INPUT` overrides `input.path`
/// - `SCRIBE_OUTPUT` overrides `output.path`
/// - `SCRIBE_SESSION_URL` overrides `output.session_url`
/// - `SCRIBE_DELIMITER` overrides `output.delimiter` (first character)
/// - `SCRIBE_BOM` overrides `output.bom` (set to "true"/"1" to enable)
/// - `SCRIBE_LOG_LEVEL` overrides `logging.level`
/// - `SCRIBE_LOG_JSON` overrides `logging.json` (set to "true"/"1")
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(input) = std::env::var("SCRIBE_INPUT") {
        config.input.path = input;
    }
    if let Ok(output) = std::env::var("SCRIBE_OUTPUT") {
        config.output.path = output;
    }
    if let Ok(url) = std::env::var("SCRIBE_SESSION_URL") {
        config.output.session_url = Some(url);
    }
    if let Ok(delimiter) = std::env::var("SCRIBE_DELIMITER") {
        if let Some(first) = delimiter.chars().next() {
            config.output.delimiter = first;
        }
    }
    if let Ok(bom) = std::env::var("SCRIBE_BOM") {
        config.output.bom = bom == "true" || bom == "1";
    }
    if let Ok(level) = std::env::var("SCRIBE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("SCRIBE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}
