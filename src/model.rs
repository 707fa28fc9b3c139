//! Neural capabilities the pipeline drives, and the data they exchange.
//!
//! | Trait             | Input                   | Output                          |
//! |-------------------|-------------------------|---------------------------------|
//! | [`AcousticModel`] | [`TokenSequence`]       | [`MelSpectrogram`] + [`Alignment`] |
//! | [`Vocoder`]       | [`MelSpectrogram`]      | 16-bit PCM samples              |
//!
//! Both are long-lived, read-mostly resources: loaded once by the front end
//! and borrowed by every synthesis call.  Implementations return
//! `anyhow::Result`; the orchestrator wraps failures into typed
//! [`TtsError`](crate::error::TtsError) variants.

use anyhow::{ensure, Result};

use crate::tokenize::TokenSequence;

// ─────────────────────────────────────────────────────────────────────────────
// Mel-spectrogram
// ─────────────────────────────────────────────────────────────────────────────

/// `frames × channels` spectrogram, row-major by time step.
#[derive(Debug, Clone, PartialEq)]
pub struct MelSpectrogram {
    frames: usize,
    channels: usize,
    data: Vec<f32>,
}

impl MelSpectrogram {
    pub fn new(frames: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        ensure!(
            data.len() == frames * channels,
            "mel data has {} values, expected {} frames x {} channels",
            data.len(),
            frames,
            channels
        );
        Ok(Self { frames, channels, data })
    }

    /// Build from a channel-major buffer (`channels × frames`, the layout
    /// Tacotron-style decoders emit).
    pub fn from_channel_major(channels: usize, frames: usize, data: &[f32]) -> Result<Self> {
        ensure!(
            data.len() == frames * channels,
            "mel data has {} values, expected {} channels x {} frames",
            data.len(),
            channels,
            frames
        );
        let mut out = vec![0.0f32; data.len()];
        for ch in 0..channels {
            for t in 0..frames {
                out[t * channels + ch] = data[ch * frames + t];
            }
        }
        Ok(Self { frames, channels, data: out })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mel bins of time step `t`.
    pub fn frame(&self, t: usize) -> &[f32] {
        &self.data[t * self.channels..(t + 1) * self.channels]
    }

    /// Copy out as `channels × frames`.
    pub fn to_channel_major(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.data.len()];
        for t in 0..self.frames {
            for ch in 0..self.channels {
                out[ch * self.frames + t] = self.data[t * self.channels + ch];
            }
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Alignment
// ─────────────────────────────────────────────────────────────────────────────

/// Attention weights, `decoder_steps × encoder_steps`, row-major.
///
/// Only kept for diagnostics; audio output never reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub decoder_steps: usize,
    pub encoder_steps: usize,
    pub weights: Vec<f32>,
}

impl Alignment {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// One acoustic model run.
#[derive(Debug, Clone)]
pub struct AcousticOutput {
    pub mel: MelSpectrogram,
    pub alignment: Alignment,
}

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Token sequence → mel-spectrogram.
pub trait AcousticModel: Send + Sync {
    /// Decode at most `max_decoder_steps` frames.  Enforcing the bound is the
    /// model's job.
    fn infer(&self, tokens: &TokenSequence, max_decoder_steps: usize) -> Result<AcousticOutput>;
}

/// Mel-spectrogram → PCM.
pub trait Vocoder: Send + Sync {
    fn generate_audio(&self, mel: &MelSpectrogram) -> Result<Vec<i16>>;

    /// Rate the vocoder was trained at, when known.
    fn sample_rate(&self) -> Option<u32> {
        None
    }
}

impl<T: AcousticModel + ?Sized> AcousticModel for &T {
    fn infer(&self, tokens: &TokenSequence, max_decoder_steps: usize) -> Result<AcousticOutput> {
        (**self).infer(tokens, max_decoder_steps)
    }
}

impl<T: Vocoder + ?Sized> Vocoder for &T {
    fn generate_audio(&self, mel: &MelSpectrogram) -> Result<Vec<i16>> {
        (**self).generate_audio(mel)
    }

    fn sample_rate(&self) -> Option<u32> {
        (**self).sample_rate()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
