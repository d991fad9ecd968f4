//! Configuration loading
//!
//! Two layers, merged at startup:
//! 1. TOML file: tool programs, voice, codec settings, logging
//! 2. Command line / environment: collection path, media dir, overrides
//!
//! Resolution priority: CLI argument > environment variable > TOML file >
//! built-in default. The tool must run with no config file at all, so every
//! TOML field has a built-in default.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from the TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Media directory override. If unset, a `<collection-stem>.media`
    /// directory beside the collection file is used.
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    /// Name of the record field holding the pronunciation term.
    #[serde(default = "default_term_field")]
    pub term_field: String,

    #[serde(default)]
    pub synthesizer: SynthesizerConfig,

    #[serde(default)]
    pub transcoder: TranscoderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            media_dir: None,
            term_field: default_term_field(),
            synthesizer: SynthesizerConfig::default(),
            transcoder: TranscoderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Speech synthesizer invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizerConfig {
    /// Program name or path. A bare name is resolved via PATH at startup.
    #[serde(default = "default_synthesizer_program")]
    pub program: String,

    /// Voice passed to the synthesizer.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Output sample rate in Hz for the intermediate waveform.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Per-invocation time limit. The child is killed past it.
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            program: default_synthesizer_program(),
            voice: default_voice(),
            sample_rate: default_sample_rate(),
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// Audio transcoder invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderConfig {
    /// Program name or path. A bare name is resolved via PATH at startup.
    #[serde(default = "default_transcoder_program")]
    pub program: String,

    /// Output audio codec.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Encoder quality scale (0 best, 9 worst for libmp3lame VBR).
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Per-invocation time limit. The child is killed past it.
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: default_transcoder_program(),
            codec: default_codec(),
            quality: default_quality(),
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_term_field() -> String {
    "term".to_string()
}

fn default_synthesizer_program() -> String {
    "say".to_string()
}

fn default_voice() -> String {
    "Alice".to_string()
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_transcoder_program() -> String {
    "ffmpeg".to_string()
}

fn default_codec() -> String {
    "libmp3lame".to_string()
}

fn default_quality() -> u8 {
    2
}

fn default_tool_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line overrides applied on top of the TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub media_dir: Option<PathBuf>,
    pub term_field: Option<String>,
    pub voice: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite collection file.
    pub collection_path: PathBuf,

    /// Media directory override; `None` derives it from the collection path.
    pub media_dir: Option<PathBuf>,

    /// Name of the record field holding the pronunciation term.
    pub term_field: String,

    pub synthesizer: SynthesizerConfig,
    pub transcoder: TranscoderConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration: TOML file (explicit path, else the platform
    /// default location, else built-in defaults) with CLI overrides on top.
    pub fn load(
        collection_path: PathBuf,
        toml_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let toml_config = match toml_path {
            Some(path) => Self::read_toml(path)?,
            None => {
                let default_path = default_config_path();
                match &default_path {
                    Some(path) if path.exists() => Self::read_toml(path)?,
                    _ => TomlConfig::default(),
                }
            }
        };

        let mut synthesizer = toml_config.synthesizer;
        if let Some(voice) = overrides.voice {
            synthesizer.voice = voice;
        }

        Ok(Config {
            collection_path,
            media_dir: overrides.media_dir.or(toml_config.media_dir),
            term_field: overrides.term_field.unwrap_or(toml_config.term_field),
            synthesizer,
            transcoder: toml_config.transcoder,
            logging: toml_config.logging,
        })
    }

    fn read_toml(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read config file {:?}: {}", path, e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("parse config file {:?}: {}", path, e)))?;
        Ok(config)
    }
}

/// Platform config file location: `<config dir>/deckvoice/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deckvoice").join("config.toml"))
}
