//! Input normalisation shared by every front end.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TtsError};
use crate::synthesize::SynthesisInput;

/// Inputs at least this long (in chars) are split into sentences.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 160;

/// User text ready for the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub split: bool,
}

impl Prompt {
    pub fn input(&self) -> SynthesisInput {
        SynthesisInput::Single(self.text.clone())
    }
}

/// Append a period unless `text` already ends in ASCII punctuation.
pub fn ensure_terminal_punctuation(text: &str) -> String {
    match text.chars().last() {
        Some(c) if c.is_ascii_punctuation() => text.to_string(),
        None => String::new(),
        _ => format!("{}.", text),
    }
}

/// Trim, reject empty text, terminate with punctuation and decide whether
/// to split.
pub fn prepare(raw: &str, split_threshold: usize) -> Result<Prompt> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TtsError::EmptyText);
    }
    let text = ensure_terminal_punctuation(trimmed);
    let split = text.chars().count() >= split_threshold;
    Ok(Prompt { text, split })
}

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

fn unique_millis() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let prev = LAST_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        .unwrap_or(now);
    now.max(prev + 1)
}

/// `<dir>/<unix millis>.wav`, unique within this process.
pub fn audio_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.wav", unique_millis()))
}
