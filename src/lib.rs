//! # herzog-tts
//!
//! Tacotron-style text-to-speech pipeline: text in, 16-bit PCM WAV out.
//!
//! ## Quick start
//!
//! ```no_run
//! # #[cfg(feature = "onnx")]
//! # fn main() -> anyhow::Result<()> {
//! use std::path::Path;
//! use herzog_tts::{onnx::{OnnxAcousticModel, OnnxVocoder}, SynthesisOptions, Synthesizer};
//!
//! let model = OnnxAcousticModel::load(Path::new("Model/Werner_Herzog/Werner_Herzog.onnx"))?;
//! let vocoder = OnnxVocoder::load(
//!     Path::new("Vocoder/Pretrained/g_02500000.onnx"),
//!     Path::new("Vocoder/Pretrained/config.json"),
//! )?;
//!
//! let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
//! let report = synth.synthesize(
//!     &"Every man for himself and God against all.".into(),
//!     Some(Path::new("output.wav")),
//!     &SynthesisOptions::default(),
//! )?;
//! println!("done in {:?}", report.elapsed);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "onnx"))]
//! # fn main() {}
//! ```
//!
//! ## Pipeline
//! 1. **Segmentation**: optional sentence splitting of long input.
//! 2. **Cleaning**: abbreviations, currency, numbers → words; case folding.
//! 3. **Encoding**: characters mapped to alphabet IDs.
//! 4. **Acoustic model**: IDs → mel-spectrogram (+ alignment).
//! 5. **Vocoder**: mel → PCM.
//! 6. **Assembly**: per-segment PCM joined with silence, written as WAV.
//!
//! The acoustic model and vocoder are traits ([`AcousticModel`],
//! [`Vocoder`]); the `onnx` feature ships ONNX Runtime implementations.

pub mod audio;
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod model;
pub mod preprocess;
pub mod segment;
pub mod synthesize;
pub mod tokenize;

#[cfg(feature = "onnx")]
pub mod onnx;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use error::{ErrorKind, TtsError};
pub use model::{AcousticModel, AcousticOutput, Alignment, MelSpectrogram, Vocoder};
pub use synthesize::{
    synthesize, AudioSummary, SegmentOutput, SynthesisInput, SynthesisOptions, SynthesisReport,
    Synthesizer,
};
pub use tokenize::{Alphabet, TokenSequence, UnknownSymbolPolicy};
