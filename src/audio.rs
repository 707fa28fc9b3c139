//! PCM assembly and WAV output.
//!
//! Segments are joined with zero-filled silence between them (never before
//! the first or after the last).  Samples are copied as-is: no resampling,
//! normalisation or clipping.

use std::path::Path;

use crate::error::{Result, TtsError};

/// Number of silence samples for `padding_secs` at `sample_rate`.
pub fn silence_samples(padding_secs: f64, sample_rate: u32) -> usize {
    let n = (padding_secs * f64::from(sample_rate)).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Concatenate `segments`, inserting `silence_len` zeros between neighbours.
pub fn assemble<S: AsRef<[i16]>>(segments: &[S], silence_len: usize) -> Vec<i16> {
    let total: usize = segments.iter().map(|s| s.as_ref().len()).sum::<usize>()
        + silence_len * segments.len().saturating_sub(1);
    let mut audio = Vec::with_capacity(total);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            audio.resize(audio.len() + silence_len, 0);
        }
        audio.extend_from_slice(segment.as_ref());
    }
    audio
}

pub fn duration_secs(samples: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples as f64 / f64::from(sample_rate)
}

/// Write mono 16-bit PCM.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let wrap = |source| TtsError::Write { path: path.to_path_buf(), source };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wrap)?;
    for &s in samples {
        writer.write_sample(s).map_err(wrap)?;
    }
    writer.finalize().map_err(wrap)?;

    log::info!(
        "Saved {} samples ({:.2} s) to {}",
        samples.len(),
        duration_secs(samples.len(), sample_rate),
        path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
