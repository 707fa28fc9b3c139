//! ONNX Runtime backends for [`AcousticModel`] and [`Vocoder`].
//!
//! Uses [`ort`] for inference.  Expected graph signatures:
//!
//! **Acoustic model** (exported Tacotron2 with the decoder loop inside the graph)
//!
//! | Name                | Shape              | dtype   |
//! |---------------------|--------------------|---------|
//! | `input_ids`         | `[1, seq_len]`     | int64   |
//! | `max_decoder_steps` | `[1]`              | int64   |
//! | → mel (output 0)    | `[1, n_mels, T]`   | float32 |
//! | → alignment (opt.)  | `[1, T, seq_len]`  | float32 |
//!
//! **Vocoder** (HiFi-GAN generator)
//!
//! | Name             | Shape            | dtype   |
//! |------------------|------------------|---------|
//! | `mel`            | `[1, n_mels, T]` | float32 |
//! | → audio (out 0)  | `[1, 1, N]`      | float32 in `[-1, 1]` |

use std::{path::Path, sync::Mutex};

use anyhow::{anyhow, bail, Context, Result};
use ort::{session::Session, value::Tensor};
use serde::Deserialize;

use crate::error::TtsError;
use crate::model::{AcousticModel, AcousticOutput, Alignment, MelSpectrogram, Vocoder};
use crate::tokenize::TokenSequence;

/// Scale from float audio to 16-bit PCM (HiFi-GAN's `MAX_WAV_VALUE`).
const MAX_WAV_VALUE: f32 = 32_768.0;

fn open_session(path: &Path, what: &'static str) -> Result<Session, TtsError> {
    if !path.is_file() {
        return Err(TtsError::MissingFile { what, path: path.to_path_buf() });
    }
    let load_error = |e: String| TtsError::Config(format!("cannot load {} {}: {}", what, path.display(), e));
    Session::builder()
        .map_err(|e| load_error(e.to_string()))?
        .commit_from_file(path)
        .map_err(|e| load_error(e.to_string()))
}

/// Extract output `index` as `(dims, data)`.
fn extract_f32(outputs: &ort::session::SessionOutputs, index: usize) -> Result<(Vec<usize>, Vec<f32>)> {
    let (shape, data) = outputs[index]
        .try_extract_tensor::<f32>()
        .with_context(|| format!("Failed to extract output {}", index))?;
    let dims = shape.iter().map(|&d| d.max(0) as usize).collect();
    Ok((dims, data.to_vec()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Acoustic model
// ─────────────────────────────────────────────────────────────────────────────

pub struct OnnxAcousticModel {
    session: Mutex<Session>,
}

impl OnnxAcousticModel {
    /// Load an exported acoustic model graph.
    pub fn load(model_path: &Path) -> Result<Self, TtsError> {
        let session = open_session(model_path, "acoustic model")?;
        log::info!("Loaded acoustic model from {}", model_path.display());
        Ok(Self { session: Mutex::new(session) })
    }
}

impl AcousticModel for OnnxAcousticModel {
    fn infer(&self, tokens: &TokenSequence, max_decoder_steps: usize) -> Result<AcousticOutput> {
        let seq_len = tokens.len();
        if seq_len == 0 {
            bail!("token sequence is empty");
        }

        let t_input_ids = Tensor::<i64>::from_array(([1usize, seq_len], tokens.ids().to_vec()))
            .context("Failed to build input_ids tensor")?;
        let t_steps = Tensor::<i64>::from_array(([1usize], vec![max_decoder_steps as i64]))
            .context("Failed to build max_decoder_steps tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("acoustic model session mutex poisoned"))?;
        let outputs = session
            .run(ort::inputs![t_input_ids, t_steps])
            .context("Acoustic model inference failed")?;

        let (dims, mel_data) = extract_f32(&outputs, 0)?;
        let (channels, frames) = match dims.as_slice() {
            [1, c, t] | [c, t] => (*c, *t),
            other => bail!("unexpected mel shape {:?}", other),
        };
        let mel = MelSpectrogram::from_channel_major(channels, frames, &mel_data)?;

        let alignment = if outputs.len() > 1 {
            let (dims, weights) = extract_f32(&outputs, 1)?;
            match dims.as_slice() {
                [1, d, e] | [d, e] => Alignment { decoder_steps: *d, encoder_steps: *e, weights },
                other => bail!("unexpected alignment shape {:?}", other),
            }
        } else {
            Alignment::default()
        };

        Ok(AcousticOutput { mel, alignment })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vocoder
// ─────────────────────────────────────────────────────────────────────────────

/// The fields of a HiFi-GAN `config.json` the runner needs; everything else
/// (upsampling rates, kernel sizes, ...) is baked into the graph.
#[derive(Debug, Clone, Deserialize)]
pub struct VocoderConfig {
    pub sampling_rate: u32,
    #[serde(default = "default_num_mels")]
    pub num_mels: usize,
}

fn default_num_mels() -> usize {
    80
}

impl VocoderConfig {
    pub fn from_file(path: &Path) -> Result<Self, TtsError> {
        if !path.is_file() {
            return Err(TtsError::MissingFile { what: "vocoder config", path: path.to_path_buf() });
        }
        let bytes = std::fs::read(path)
            .map_err(|e| TtsError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TtsError::Config(format!("invalid vocoder config {}: {}", path.display(), e)))
    }
}

pub struct OnnxVocoder {
    session: Mutex<Session>,
    config: VocoderConfig,
}

impl OnnxVocoder {
    /// Load a vocoder graph and its JSON config.
    pub fn load(model_path: &Path, config_path: &Path) -> Result<Self, TtsError> {
        let config = VocoderConfig::from_file(config_path)?;
        let session = open_session(model_path, "vocoder model")?;
        log::info!(
            "Loaded vocoder from {} ({} Hz, {} mels)",
            model_path.display(),
            config.sampling_rate,
            config.num_mels
        );
        Ok(Self { session: Mutex::new(session), config })
    }

    pub fn config(&self) -> &VocoderConfig {
        &self.config
    }
}

impl Vocoder for OnnxVocoder {
    fn generate_audio(&self, mel: &MelSpectrogram) -> Result<Vec<i16>> {
        if mel.channels() != self.config.num_mels {
            bail!(
                "mel has {} channels but the vocoder expects {}",
                mel.channels(),
                self.config.num_mels
            );
        }

        let t_mel = Tensor::<f32>::from_array((
            [1usize, mel.channels(), mel.frames()],
            mel.to_channel_major(),
        ))
        .context("Failed to build mel tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("vocoder session mutex poisoned"))?;
        let outputs = session.run(ort::inputs![t_mel]).context("Vocoder inference failed")?;
        let (_dims, audio) = extract_f32(&outputs, 0)?;

        // `as` saturates, so out-of-range peaks clamp to i16 bounds.
        Ok(audio.into_iter().map(|s| (s * MAX_WAV_VALUE) as i16).collect())
    }

    fn sample_rate(&self) -> Option<u32> {
        Some(self.config.sampling_rate)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
