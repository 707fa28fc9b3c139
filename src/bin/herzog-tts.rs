//! herzog-tts command-line front end.
//!
//! Usage:
//!   herzog-tts speak --text "Hello there" --output hello.wav
//!   herzog-tts --config herzog.json repl

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use herzog_tts::config::AppConfig;
use herzog_tts::frontend::cli::Repl;
use herzog_tts::frontend::prompt::{audio_file_path, prepare};
use herzog_tts::onnx::{OnnxAcousticModel, OnnxVocoder};
use herzog_tts::{logging, Synthesizer};

#[derive(Parser)]
#[command(name = "herzog-tts", version, about = "Text-to-speech with a Tacotron-style model and a neural vocoder")]
struct Args {
    /// JSON config file (defaults + HERZOG_TTS_* overrides when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesise one text and exit
    Speak {
        /// Text to synthesise
        #[arg(short, long)]
        text: String,

        /// Output WAV path (defaults to <audio_dir>/<millis>.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force sentence splitting regardless of length
        #[arg(long)]
        split: bool,
    },

    /// Read lines from stdin until the exit keyword
    Repl,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    logging::init(&config.logging);

    config.validate().context("Startup check failed")?;
    config.ensure_audio_dir()?;

    let model = OnnxAcousticModel::load(&config.model_path)?;
    let vocoder = OnnxVocoder::load(&config.vocoder_model_path, &config.vocoder_config_path)?;
    let synthesizer = Synthesizer::new(&model).with_vocoder(&vocoder);

    match args.command {
        Command::Speak { text, output, split } => {
            let prompt = prepare(&text, config.split_threshold)?;
            let path = output.unwrap_or_else(|| audio_file_path(&config.audio_dir));
            let options = config.synthesis_options().with_split_text(split || prompt.split);
            let report = synthesizer.synthesize(&prompt.input(), Some(&path), &options)?;
            println!(
                "Saved {} ({} segment(s), {:.2} s of audio, {:.2} s elapsed)",
                path.display(),
                report.segments.len(),
                report.audio.as_ref().map(|a| a.duration_secs()).unwrap_or(0.0),
                report.elapsed.as_secs_f64()
            );
        }
        Command::Repl => {
            let repl = Repl::new(&synthesizer, &config);
            let stdin = std::io::stdin();
            let summary = repl.run(stdin.lock(), std::io::stdout())?;
            log::info!("{} clip(s) synthesised, {} failed", summary.synthesized, summary.failed);
        }
    }
    Ok(())
}
