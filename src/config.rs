//! Application configuration for the front ends.
//!
//! Read from an optional JSON file (every field has a default), then
//! individual fields can be overridden with `HERZOG_TTS_*` environment
//! variables:
//!
//! ```json
//! {
//!   "model_path": "Model/Werner_Herzog/Werner_Herzog.onnx",
//!   "vocoder_model_path": "Vocoder/Pretrained/g_02500000.onnx",
//!   "vocoder_config_path": "Vocoder/Pretrained/config.json",
//!   "audio_dir": "Audio",
//!   "command_prefix": "!herzog",
//!   "split_threshold": 160,
//!   "on_unknown_symbol": "drop",
//!   "logging": { "level": "info", "format": "text" }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::TtsError;
use crate::synthesize::{
    SynthesisOptions, DEFAULT_MAX_DECODER_STEPS, DEFAULT_SAMPLE_RATE, DEFAULT_SILENCE_PADDING,
};
use crate::tokenize::{Alphabet, UnknownSymbolPolicy};

/// Prefix of the environment variables that override config fields.
pub const ENV_PREFIX: &str = "HERZOG_TTS_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Text }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub vocoder_model_path: PathBuf,
    pub vocoder_config_path: PathBuf,
    /// Where generated clips are written; created at startup if absent.
    pub audio_dir: PathBuf,

    /// Chat trigger word, matched case-insensitively in group contexts.
    pub command_prefix: String,
    /// Word that ends the interactive prompt (case-insensitive).
    pub exit_keyword: String,
    /// Inputs with at least this many characters are split into sentences.
    pub split_threshold: usize,

    pub silence_padding: f64,
    pub sample_rate: u32,
    pub max_decoder_steps: usize,
    /// Ordered symbol list; the built-in English alphabet when unset.
    pub alphabet: Option<String>,
    pub on_unknown_symbol: UnknownSymbolPolicy,

    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("Model/Werner_Herzog/Werner_Herzog.onnx"),
            vocoder_model_path: PathBuf::from("Vocoder/Pretrained/g_02500000.onnx"),
            vocoder_config_path: PathBuf::from("Vocoder/Pretrained/config.json"),
            audio_dir: PathBuf::from("Audio"),
            command_prefix: "!herzog".to_string(),
            exit_keyword: "exit".to_string(),
            split_threshold: 160,
            silence_padding: DEFAULT_SILENCE_PADDING,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_decoder_steps: DEFAULT_MAX_DECODER_STEPS,
            alphabet: None,
            on_unknown_symbol: UnknownSymbolPolicy::Drop,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `path` (or the defaults) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Cannot read config: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Override fields from `lookup("HERZOG_TTS_<FIELD>")`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: &str| lookup(&format!("{}{}", ENV_PREFIX, field));

        if let Some(v) = get("MODEL_PATH") {
            self.model_path = v.into();
        }
        if let Some(v) = get("VOCODER_MODEL_PATH") {
            self.vocoder_model_path = v.into();
        }
        if let Some(v) = get("VOCODER_CONFIG_PATH") {
            self.vocoder_config_path = v.into();
        }
        if let Some(v) = get("AUDIO_DIR") {
            self.audio_dir = v.into();
        }
        if let Some(v) = get("COMMAND_PREFIX") {
            self.command_prefix = v;
        }
        if let Some(v) = get("EXIT_KEYWORD") {
            self.exit_keyword = v;
        }
        if let Some(v) = get("SPLIT_THRESHOLD") {
            self.split_threshold = v.parse().with_context(|| format!("Invalid split threshold {:?}", v))?;
        }
        if let Some(v) = get("SILENCE_PADDING") {
            self.silence_padding = v.parse().with_context(|| format!("Invalid silence padding {:?}", v))?;
        }
        if let Some(v) = get("SAMPLE_RATE") {
            self.sample_rate = v.parse().with_context(|| format!("Invalid sample rate {:?}", v))?;
        }
        if let Some(v) = get("MAX_DECODER_STEPS") {
            self.max_decoder_steps = v.parse().with_context(|| format!("Invalid max decoder steps {:?}", v))?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    /// Startup check: every model file must exist.
    pub fn validate(&self) -> Result<(), TtsError> {
        let required = [
            ("acoustic model", &self.model_path),
            ("vocoder model", &self.vocoder_model_path),
            ("vocoder config", &self.vocoder_config_path),
        ];
        for (what, path) in required {
            if !path.is_file() {
                return Err(TtsError::MissingFile { what, path: path.clone() });
            }
        }
        Ok(())
    }

    /// Create the audio output directory if it doesn't already exist.
    pub fn ensure_audio_dir(&self) -> Result<(), TtsError> {
        std::fs::create_dir_all(&self.audio_dir).map_err(|e| {
            TtsError::Config(format!("cannot create {}: {}", self.audio_dir.display(), e))
        })
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            alphabet: self.alphabet.as_deref().map(Alphabet::from).unwrap_or_default(),
            silence_padding: self.silence_padding,
            sample_rate: self.sample_rate,
            max_decoder_steps: self.max_decoder_steps,
            split_text: false,
            on_unknown_symbol: self.on_unknown_symbol,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
