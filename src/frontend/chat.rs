//! Chat-bot adapter.
//!
//! Platform-neutral: the host binds [`ChatChannel`] to its chat API and feeds
//! every inbound message to [`ChatBot::handle`].  The bot decides whether the
//! message is addressed to it, posts an acknowledgement, synthesises, and
//! replaces the acknowledgement with the clip or an error.  The clip is a
//! temporary file removed once the message has been handled.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::error::TtsError;
use crate::frontend::prompt::{audio_file_path, prepare};
use crate::synthesize::{AudioSummary, SynthesisOptions, Synthesizer};

pub type MessageId = u64;

pub const EMPTY_TEXT_REPLY: &str = "Error! Text is empty";
pub const ACK_REPLY: &str = "Generating audio...";
pub const FILE_ERROR_REPLY: &str = "Error creating file";
pub const SEND_ERROR_REPLY: &str = "Error sending file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub content: String,
    pub author_is_bot: bool,
    /// Sent in a shared channel (as opposed to a direct message); such
    /// messages must start with the command prefix.
    pub in_group: bool,
}

/// Where replies go.
pub trait ChatChannel {
    fn send_text(&mut self, text: &str) -> anyhow::Result<MessageId>;
    fn delete_message(&mut self, id: MessageId) -> anyhow::Result<()>;
    fn send_audio(&mut self, path: &Path, caption: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub enum ChatOutcome {
    /// Not addressed to the bot.
    Ignored,
    /// Addressed to the bot but nothing to say.
    Rejected,
    /// Synthesis failed; the error was posted to the channel.
    Failed(TtsError),
    /// Audio was produced but could not be handed over.
    DeliveryFailed(TtsError),
    Delivered { text: String, audio: AudioSummary },
}

/// Removes the clip when dropped, whatever path the handler took.
struct TempClip(PathBuf);

impl Drop for TempClip {
    fn drop(&mut self) {
        if self.0.exists() {
            if let Err(e) = std::fs::remove_file(&self.0) {
                log::warn!("cannot remove {}: {}", self.0.display(), e);
            }
        }
    }
}

pub struct ChatBot<'a> {
    synthesizer: &'a Synthesizer<'a>,
    options: SynthesisOptions,
    prefix: String,
    audio_dir: PathBuf,
    split_threshold: usize,
    // One synthesis at a time per model pair.
    busy: Mutex<()>,
}

impl<'a> ChatBot<'a> {
    pub fn new(synthesizer: &'a Synthesizer<'a>, config: &AppConfig) -> Self {
        Self {
            synthesizer,
            options: config.synthesis_options(),
            prefix: config.command_prefix.clone(),
            audio_dir: config.audio_dir.clone(),
            split_threshold: config.split_threshold,
            busy: Mutex::new(()),
        }
    }

    /// Text addressed to the bot, or `None` if the message should be ignored.
    pub fn extract_text<'m>(&self, message: &'m InboundMessage) -> Option<&'m str> {
        let content = message.content.trim_start();
        // No tokens at all, e.g. a bare attachment.
        let first = content.split_whitespace().next()?;
        if message.author_is_bot {
            return None;
        }
        let has_prefix = first.eq_ignore_ascii_case(&self.prefix);
        if message.in_group && !has_prefix {
            return None;
        }
        Some(if has_prefix { &content[first.len()..] } else { content })
    }

    /// Handle one inbound message.  Errors are channel (transport) failures;
    /// synthesis and delivery problems are reported in the outcome.
    pub fn handle<C: ChatChannel + ?Sized>(
        &self,
        message: &InboundMessage,
        channel: &mut C,
    ) -> anyhow::Result<ChatOutcome> {
        let Some(raw) = self.extract_text(message) else {
            log::debug!("ignoring message");
            return Ok(ChatOutcome::Ignored);
        };

        let prompt = match prepare(raw, self.split_threshold) {
            Ok(prompt) => prompt,
            Err(_) => {
                channel.send_text(EMPTY_TEXT_REPLY)?;
                return Ok(ChatOutcome::Rejected);
            }
        };

        let ack = channel.send_text(ACK_REPLY)?;
        let clip = TempClip(audio_file_path(&self.audio_dir));
        let options = self.options.clone().with_split_text(prompt.split);

        let result = {
            let _guard = self.busy.lock().unwrap_or_else(|p| p.into_inner());
            self.synthesizer.synthesize_to_file(&prompt.input(), &clip.0, &options)
        };
        let audio = match result {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("Error synthesizing voice: {}", e);
                retract(channel, ack);
                channel.send_text(&e.to_string())?;
                return Ok(ChatOutcome::Failed(e));
            }
        };

        if let Err(e) = open_clip(&clip.0) {
            log::error!("Error creating file: {}", e);
            retract(channel, ack);
            channel.send_text(FILE_ERROR_REPLY)?;
            return Ok(ChatOutcome::DeliveryFailed(e));
        }

        retract(channel, ack);
        if let Err(e) = channel.send_audio(&clip.0, &prompt.text) {
            log::error!("Error sending file: {:#}", e);
            channel.send_text(SEND_ERROR_REPLY)?;
            return Ok(ChatOutcome::DeliveryFailed(TtsError::Delivery {
                path: clip.0.clone(),
                reason: format!("{:#}", e),
            }));
        }

        Ok(ChatOutcome::Delivered { text: prompt.text, audio })
    }
}

/// The clip must still be readable right before upload.
fn open_clip(path: &Path) -> Result<File, TtsError> {
    File::open(path).map_err(|e| TtsError::Delivery { path: path.to_path_buf(), reason: e.to_string() })
}

/// Best-effort removal of the acknowledgement message.
fn retract<C: ChatChannel + ?Sized>(channel: &mut C, ack: MessageId) {
    if let Err(e) = channel.delete_message(ack) {
        log::warn!("cannot delete acknowledgement {}: {:#}", ack, e);
    }
}
