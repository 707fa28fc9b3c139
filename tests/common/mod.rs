#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use herzog_tts::{AcousticModel, AcousticOutput, Alignment, MelSpectrogram, TokenSequence, Vocoder};

pub const MEL_CHANNELS: usize = 4;

/// Emits one mel frame per token (capped at the decoder bound) and records
/// every call.
#[derive(Default)]
pub struct FakeModel {
    pub calls: Mutex<Vec<Vec<i64>>>,
    /// Fail on this call index.
    pub fail_on: Option<usize>,
}

impl FakeModel {
    pub fn failing_on(call: usize) -> Self {
        Self { fail_on: Some(call), ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AcousticModel for FakeModel {
    fn infer(&self, tokens: &TokenSequence, max_decoder_steps: usize) -> anyhow::Result<AcousticOutput> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(tokens.ids().to_vec());
        if self.fail_on == Some(index) {
            anyhow::bail!("decoder exploded on segment {}", index);
        }

        let frames = tokens.len().min(max_decoder_steps);
        let data = tokens.ids()[..frames]
            .iter()
            .flat_map(|&id| std::iter::repeat(id as f32).take(MEL_CHANNELS))
            .collect();
        Ok(AcousticOutput {
            mel: MelSpectrogram::new(frames, MEL_CHANNELS, data)?,
            alignment: Alignment {
                decoder_steps: frames,
                encoder_steps: tokens.len(),
                weights: vec![0.0; frames * tokens.len()],
            },
        })
    }
}

/// `samples_per_frame` samples per mel frame, each equal to the frame's
/// first bin plus one (so no sample is zero).
pub struct FakeVocoder {
    pub samples_per_frame: usize,
    pub native_rate: Option<u32>,
    /// Fail on this call index.
    pub fail_on: Option<usize>,
    pub calls: AtomicUsize,
}

impl Default for FakeVocoder {
    fn default() -> Self {
        Self { samples_per_frame: 10, native_rate: None, fail_on: None, calls: AtomicUsize::new(0) }
    }
}

impl FakeVocoder {
    pub fn failing_on(call: usize) -> Self {
        Self { fail_on: Some(call), ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Vocoder for FakeVocoder {
    fn generate_audio(&self, mel: &MelSpectrogram) -> anyhow::Result<Vec<i16>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(index) {
            anyhow::bail!("vocoder ran out of memory on mel {}", index);
        }
        Ok((0..mel.frames())
            .flat_map(|t| std::iter::repeat(mel.frame(t)[0] as i16 + 1).take(self.samples_per_frame))
            .collect())
    }

    fn sample_rate(&self) -> Option<u32> {
        self.native_rate
    }
}

pub fn read_wav(path: &std::path::Path) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}
