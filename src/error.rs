//! Typed failures for the synthesis pipeline.
//!
//! Each variant belongs to one of four categories ([`ErrorKind`]) so front
//! ends can tell a bad deployment from a bad request from a model failure
//! without matching on message strings.

use std::path::PathBuf;

use thiserror::Error;

/// Broad failure category of a [`TtsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal at startup: missing files, invalid options.
    Configuration,
    /// Per-request, caller's fault: nothing to synthesize.
    Usage,
    /// Per-request: cleaning, encoding, inference, vocoding or writing failed.
    Synthesis,
    /// Per-request, adapter-specific: the result could not be handed over.
    Delivery,
}

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{what} not found: {}", path.display())]
    MissingFile { what: &'static str, path: PathBuf },

    #[error("text is empty")]
    EmptyText,

    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbol { symbol: char, position: usize },

    #[error("acoustic model inference failed: {0:#}")]
    Inference(#[source] anyhow::Error),

    #[error("vocoder failed: {0:#}")]
    Vocoder(#[source] anyhow::Error),

    #[error("cannot write audio to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("cannot deliver {}: {reason}", path.display())]
    Delivery { path: PathBuf, reason: String },
}

impl TtsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TtsError::Config(_) | TtsError::MissingFile { .. } => ErrorKind::Configuration,
            TtsError::EmptyText => ErrorKind::Usage,
            TtsError::UnknownSymbol { .. }
            | TtsError::Inference(_)
            | TtsError::Vocoder(_)
            | TtsError::Write { .. } => ErrorKind::Synthesis,
            TtsError::Delivery { .. } => ErrorKind::Delivery,
        }
    }
}

pub type Result<T, E = TtsError> = std::result::Result<T, E>;
