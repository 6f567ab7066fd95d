//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILDECODE_CONFIG` (environment variable)
//! 2. `~/.config/maildecode/config.toml` (Linux/macOS)
//!    `%APPDATA%\maildecode\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::parser::message::DecoderOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Decoding limits.
    pub decoder: DecoderConfig,
    /// Storage payload shaping.
    pub payload: PayloadConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Decoding limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum multipart nesting depth (default: 10).
    pub max_nesting_depth: usize,
    /// Maximum raw message size in bytes (default: 26214400 = 25 MB).
    pub max_message_size: usize,
    /// Rewrite bare-LF messages to CRLF before decoding.
    pub normalize_line_endings: bool,
}

/// Storage payload shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Subjects longer than this many characters are truncated.
    pub subject_max_chars: usize,
    /// Value of `workerInfo.source`.
    pub source: String,
    /// Domain part of generated message ids.
    pub message_id_domain: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        let options = DecoderOptions::default();
        Self {
            max_nesting_depth: options.max_nesting_depth,
            max_message_size: options.max_message_size,
            normalize_line_endings: options.normalize_line_endings,
        }
    }
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            subject_max_chars: 200,
            source: "maildecode".to_string(),
            message_id_domain: "maildecode.local".to_string(),
        }
    }
}

impl From<&DecoderConfig> for DecoderOptions {
    fn from(config: &DecoderConfig) -> Self {
        Self {
            max_nesting_depth: config.max_nesting_depth,
            max_message_size: config.max_message_size,
            normalize_line_endings: config.normalize_line_endings,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    let Some(path) = config_file_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_config_from(&path) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "Loaded config");
            cfg
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            Config::default()
        }
    }
}

/// Read and parse one config file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| DecodeError::io(path, e))?;
    toml::from_str::<Config>(&contents).map_err(|e| DecodeError::InvalidConfig(e.to_string()))
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILDECODE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("maildecode").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("maildecode")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.decoder.max_nesting_depth, 10);
        assert_eq!(cfg.decoder.max_message_size, 25 * 1024 * 1024);
        assert!(cfg.decoder.normalize_line_endings);
        assert_eq!(cfg.payload.subject_max_chars, 200);
    }

    #[test]
    fn test_decoder_options_match_config() {
        let cfg = DecoderConfig::default();
        assert_eq!(DecoderOptions::from(&cfg), DecoderOptions::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[decoder]
max_nesting_depth = 3

[payload]
source = "inbound-worker"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.decoder.max_nesting_depth, 3);
        assert_eq!(cfg.payload.source, "inbound-worker");
        assert!(cfg.decoder.normalize_line_endings);
        assert_eq!(cfg.payload.subject_max_chars, 200);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").expect("write");
        let cfg = load_config_from(&path).expect("load");
        assert_eq!(cfg.general.log_level, "debug");
    }

    #[test]
    fn test_load_config_from_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[decoder]\nmax_nesting_depth = \"deep\"\n").expect("write");
        assert!(matches!(
            load_config_from(&path),
            Err(DecodeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.payload.source, cfg.payload.source);
        assert_eq!(
            parsed.decoder.max_message_size,
            cfg.decoder.max_message_size
        );
    }
}
