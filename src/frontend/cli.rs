//! Interactive prompt: read a line, speak it, repeat until the exit keyword.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::Result;
use crate::frontend::prompt::{audio_file_path, prepare};
use crate::synthesize::{AudioSummary, SynthesisOptions, Synthesizer};

/// Counters returned when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplSummary {
    pub synthesized: usize,
    pub failed: usize,
}

pub struct Repl<'a> {
    synthesizer: &'a Synthesizer<'a>,
    options: SynthesisOptions,
    audio_dir: PathBuf,
    exit_keyword: String,
    split_threshold: usize,
}

impl<'a> Repl<'a> {
    pub fn new(synthesizer: &'a Synthesizer<'a>, config: &AppConfig) -> Self {
        Self {
            synthesizer,
            options: config.synthesis_options(),
            audio_dir: config.audio_dir.clone(),
            exit_keyword: config.exit_keyword.clone(),
            split_threshold: config.split_threshold,
        }
    }

    /// Synthesise one line of user input into a fresh file under the audio
    /// directory.
    pub fn speak(&self, line: &str) -> Result<AudioSummary> {
        let prompt = prepare(line, self.split_threshold)?;
        let path = audio_file_path(&self.audio_dir);
        let options = self.options.clone().with_split_text(prompt.split);
        self.synthesizer.synthesize_to_file(&prompt.input(), &path, &options)
    }

    /// Run until the exit keyword (case-insensitive) or end of input.
    /// Synthesis errors are reported on `out` and the loop carries on.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> io::Result<ReplSummary> {
        let mut summary = ReplSummary::default();
        let mut line = String::new();

        loop {
            write!(out, "Enter text (or '{}' to exit program): ", self.exit_keyword)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            let text = line.trim_end_matches(['\r', '\n']);
            if text.trim().eq_ignore_ascii_case(&self.exit_keyword) {
                break;
            }

            match self.speak(text) {
                Ok(audio) => {
                    summary.synthesized += 1;
                    writeln!(out, "Saved {} ({:.2} s)", audio.path.display(), audio.duration_secs())?;
                }
                Err(e) => {
                    summary.failed += 1;
                    log::warn!("synthesis failed: {}", e);
                    writeln!(out, "Error: {}", e)?;
                }
            }
        }

        writeln!(out, "Exiting program...")?;
        Ok(summary)
    }
}
