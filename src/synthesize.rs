//! Synthesis orchestration: text → segments → mels → PCM → WAV.
//!
//! ```text
//! SynthesisInput ──split?──▶ segments ──clean──▶ encode ──▶ AcousticModel
//!                                                               │ mel
//!                         WAV ◀── assemble(+silence) ◀── Vocoder┘
//! ```
//!
//! Segments run strictly in order on the calling thread.  Nothing is written
//! until every segment has been vocoded, so a failure part-way through leaves
//! no audio file behind.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio;
use crate::error::{Result, TtsError};
use crate::model::{AcousticModel, Alignment, MelSpectrogram, Vocoder};
use crate::preprocess::TextCleaner;
use crate::segment::SentenceSegmenter;
use crate::tokenize::{encode, Alphabet, UnknownSymbolPolicy};

/// Seconds of silence between segments.
pub const DEFAULT_SILENCE_PADDING: f64 = 0.15;

/// Output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// Decoder step ceiling handed to the acoustic model.
pub const DEFAULT_MAX_DECODER_STEPS: usize = 3_000;

// ─────────────────────────────────────────────────────────────────────────────
// Inputs and options
// ─────────────────────────────────────────────────────────────────────────────

/// Text to synthesise: one block, or lines the caller already split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisInput {
    Single(String),
    Segments(Vec<String>),
}

impl From<&str> for SynthesisInput {
    fn from(text: &str) -> Self {
        SynthesisInput::Single(text.to_string())
    }
}

impl From<String> for SynthesisInput {
    fn from(text: String) -> Self {
        SynthesisInput::Single(text)
    }
}

impl From<Vec<String>> for SynthesisInput {
    fn from(lines: Vec<String>) -> Self {
        SynthesisInput::Segments(lines)
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    pub alphabet: Alphabet,
    /// Silence between segments, in seconds.
    pub silence_padding: f64,
    pub sample_rate: u32,
    pub max_decoder_steps: usize,
    /// Run a [`SentenceSegmenter`] over [`SynthesisInput::Single`] text.
    pub split_text: bool,
    pub on_unknown_symbol: UnknownSymbolPolicy,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            silence_padding: DEFAULT_SILENCE_PADDING,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_decoder_steps: DEFAULT_MAX_DECODER_STEPS,
            split_text: false,
            on_unknown_symbol: UnknownSymbolPolicy::Drop,
        }
    }
}

impl SynthesisOptions {
    pub fn with_split_text(mut self, split_text: bool) -> Self {
        self.split_text = split_text;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(TtsError::Config("sample rate must be positive".into()));
        }
        if self.max_decoder_steps == 0 {
            return Err(TtsError::Config("max decoder steps must be positive".into()));
        }
        if !self.silence_padding.is_finite() || self.silence_padding < 0.0 {
            return Err(TtsError::Config(format!(
                "silence padding must be a non-negative number of seconds, got {}",
                self.silence_padding
            )));
        }
        if self.alphabet.is_empty() {
            return Err(TtsError::Config("alphabet is empty".into()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SegmentOutput {
    /// Trimmed source text.
    pub text: String,
    /// Text after cleaning, as fed to the encoder.
    pub cleaned: String,
    pub token_count: usize,
    pub mel: MelSpectrogram,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSummary {
    pub path: PathBuf,
    pub samples: usize,
    pub sample_rate: u32,
}

impl AudioSummary {
    pub fn duration_secs(&self) -> f64 {
        audio::duration_secs(self.samples, self.sample_rate)
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisReport {
    pub segments: Vec<SegmentOutput>,
    /// Present when an output path was requested.
    pub audio: Option<AudioSummary>,
    pub elapsed: Duration,
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthesizer
// ─────────────────────────────────────────────────────────────────────────────

/// Borrows the model pair for the duration of one or more synthesis calls.
pub struct Synthesizer<'m> {
    model: &'m dyn AcousticModel,
    vocoder: Option<&'m dyn Vocoder>,
    cleaner: TextCleaner,
    segmenter: SentenceSegmenter,
}

impl<'m> Synthesizer<'m> {
    pub fn new(model: &'m dyn AcousticModel) -> Self {
        Self {
            model,
            vocoder: None,
            cleaner: TextCleaner::new(),
            segmenter: SentenceSegmenter::new(),
        }
    }

    pub fn with_vocoder(mut self, vocoder: &'m dyn Vocoder) -> Self {
        self.vocoder = Some(vocoder);
        self
    }

    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_segmenter(mut self, segmenter: SentenceSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn has_vocoder(&self) -> bool {
        self.vocoder.is_some()
    }

    /// Synthesise `input`.  With `audio_path`, the assembled clip is written
    /// there; without it only the spectrograms are produced.
    pub fn synthesize(
        &self,
        input: &SynthesisInput,
        audio_path: Option<&Path>,
        options: &SynthesisOptions,
    ) -> Result<SynthesisReport> {
        log::info!("Synthesizing audio...");
        let start = Instant::now();

        options.validate()?;
        let vocoder = match (audio_path, self.vocoder) {
            (Some(_), None) => return Err(TtsError::Config("missing vocoder".into())),
            (_, vocoder) => vocoder,
        };

        let lines = self.segment(input, options.split_text);
        if lines.is_empty() {
            return Err(TtsError::EmptyText);
        }
        log::debug!("{} segment(s)", lines.len());

        let mut segments = Vec::with_capacity(lines.len());
        for line in lines {
            let cleaned = self.cleaner.clean(&line, &options.alphabet);
            let tokens = encode(&cleaned, &options.alphabet, options.on_unknown_symbol)?;
            let output = self
                .model
                .infer(&tokens, options.max_decoder_steps)
                .map_err(TtsError::Inference)?;
            log::debug!(
                "segment {}: {} tokens -> {} mel frames",
                segments.len(),
                tokens.len(),
                output.mel.frames()
            );
            segments.push(SegmentOutput {
                text: line,
                cleaned,
                token_count: tokens.len(),
                mel: output.mel,
                alignment: output.alignment,
            });
        }

        let audio = match (audio_path, vocoder) {
            (Some(path), Some(vocoder)) => Some(self.render(&segments, vocoder, path, options)?),
            _ => None,
        };

        let elapsed = start.elapsed();
        log::info!("Synthesis completed in {:.3} second(s)", elapsed.as_secs_f64());
        Ok(SynthesisReport { segments, audio, elapsed })
    }

    /// Synthesise `input` straight to `path` and return what was written.
    pub fn synthesize_to_file(
        &self,
        input: &SynthesisInput,
        path: &Path,
        options: &SynthesisOptions,
    ) -> Result<AudioSummary> {
        let report = self.synthesize(input, Some(path), options)?;
        report.audio.ok_or_else(|| TtsError::Config("missing vocoder".into()))
    }

    /// Resolve the input into trimmed, non-empty segment strings.
    fn segment(&self, input: &SynthesisInput, split_text: bool) -> Vec<String> {
        let raw = match input {
            SynthesisInput::Single(text) if split_text => self.segmenter.split(text),
            SynthesisInput::Single(text) => vec![text.clone()],
            SynthesisInput::Segments(lines) => lines.clone(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn render(
        &self,
        segments: &[SegmentOutput],
        vocoder: &dyn Vocoder,
        path: &Path,
        options: &SynthesisOptions,
    ) -> Result<AudioSummary> {
        if let Some(native) = vocoder.sample_rate() {
            if native != options.sample_rate {
                log::warn!(
                    "vocoder was trained at {} Hz but output is written at {} Hz",
                    native,
                    options.sample_rate
                );
            }
        }

        let pcm = segments
            .iter()
            .map(|s| vocoder.generate_audio(&s.mel).map_err(TtsError::Vocoder))
            .collect::<Result<Vec<_>>>()?;

        let silence = audio::silence_samples(options.silence_padding, options.sample_rate);
        let clip = audio::assemble(&pcm, silence);
        audio::write_wav(path, &clip, options.sample_rate)?;

        Ok(AudioSummary {
            path: path.to_path_buf(),
            samples: clip.len(),
            sample_rate: options.sample_rate,
        })
    }
}

/// One-call entry point: synthesise `input` with `model` (and `vocoder` when
/// writing to `audio_path`).
pub fn synthesize(
    model: &dyn AcousticModel,
    input: impl Into<SynthesisInput>,
    audio_path: Option<&Path>,
    vocoder: Option<&dyn Vocoder>,
    options: &SynthesisOptions,
) -> Result<SynthesisReport> {
    let mut synthesizer = Synthesizer::new(model);
    if let Some(vocoder) = vocoder {
        synthesizer = synthesizer.with_vocoder(vocoder);
    }
    synthesizer.synthesize(&input.into(), audio_path, options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
