mod common;

use std::path::{Path, PathBuf};

use common::{FakeModel, FakeVocoder};
use herzog_tts::config::AppConfig;
use herzog_tts::frontend::chat::{
    ChatBot, ChatChannel, ChatOutcome, InboundMessage, MessageId, ACK_REPLY, EMPTY_TEXT_REPLY,
    FILE_ERROR_REPLY, SEND_ERROR_REPLY,
};
use herzog_tts::frontend::cli::{Repl, ReplSummary};
use herzog_tts::{ErrorKind, Synthesizer, TtsError};

// ─────────────────────────────────────────────────────────────────────────────
// Chat adapter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Text(MessageId, String),
    Deleted(MessageId),
    Audio { path: PathBuf, caption: String, existed: bool },
}

#[derive(Default)]
struct RecordingChannel {
    events: Vec<Event>,
    next_id: MessageId,
    fail_audio: bool,
}

impl RecordingChannel {
    fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Text(_, t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatChannel for RecordingChannel {
    fn send_text(&mut self, text: &str) -> anyhow::Result<MessageId> {
        self.next_id += 1;
        self.events.push(Event::Text(self.next_id, text.to_string()));
        Ok(self.next_id)
    }

    fn delete_message(&mut self, id: MessageId) -> anyhow::Result<()> {
        self.events.push(Event::Deleted(id));
        Ok(())
    }

    fn send_audio(&mut self, path: &Path, caption: &str) -> anyhow::Result<()> {
        if self.fail_audio {
            anyhow::bail!("upload rejected");
        }
        self.events.push(Event::Audio {
            path: path.to_path_buf(),
            caption: caption.to_string(),
            existed: path.is_file(),
        });
        Ok(())
    }
}

fn config(dir: &Path) -> AppConfig {
    AppConfig {
        audio_dir: dir.to_path_buf(),
        command_prefix: "!herzog".into(),
        ..AppConfig::default()
    }
}

fn group(content: &str) -> InboundMessage {
    InboundMessage { content: content.into(), author_is_bot: false, in_group: true }
}

fn direct(content: &str) -> InboundMessage {
    InboundMessage { content: content.into(), author_is_bot: false, in_group: false }
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn chat_delivers_clip_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let outcome = bot.handle(&group("!HERZOG the jungle is full of misery"), &mut channel).unwrap();

    match outcome {
        ChatOutcome::Delivered { text, audio } => {
            assert_eq!(text, "the jungle is full of misery.");
            assert!(audio.samples > 0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(channel.events[0], Event::Text(1, ACK_REPLY.into()));
    assert_eq!(channel.events[1], Event::Deleted(1));
    match &channel.events[2] {
        Event::Audio { caption, existed, .. } => {
            assert_eq!(caption, "the jungle is full of misery.");
            assert!(existed);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn chat_ignores_unaddressed_messages() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let from_bot = InboundMessage { content: "!herzog hi".into(), author_is_bot: true, in_group: false };
    for message in [group("hello everyone"), group("   "), from_bot] {
        let outcome = bot.handle(&message, &mut channel).unwrap();
        assert!(matches!(outcome, ChatOutcome::Ignored));
    }
    assert!(channel.events.is_empty());
    assert_eq!(model.call_count(), 0);
}

#[test]
fn chat_direct_messages_need_no_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let outcome = bot.handle(&direct("Nature is vile!"), &mut channel).unwrap();
    match outcome {
        ChatOutcome::Delivered { text, .. } => assert_eq!(text, "Nature is vile!"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn chat_prefix_only_is_rejected_without_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let outcome = bot.handle(&group("!herzog    "), &mut channel).unwrap();

    assert!(matches!(outcome, ChatOutcome::Rejected));
    assert_eq!(channel.texts(), vec![EMPTY_TEXT_REPLY]);
    assert_eq!(model.call_count(), 0);
}

#[test]
fn chat_synthesis_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::failing_on(0);
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let outcome = bot.handle(&group("!herzog speak"), &mut channel).unwrap();

    match outcome {
        ChatOutcome::Failed(e) => assert_eq!(e.kind(), ErrorKind::Synthesis),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(channel.events[1], Event::Deleted(1));
    let texts = channel.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].contains("decoder exploded"), "got: {}", texts[1]);
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn chat_vocoder_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::failing_on(1);
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let text = format!("!herzog Every man for himself. {}", "And God against all of them ".repeat(6));
    let outcome = bot.handle(&group(&text), &mut channel).unwrap();

    match outcome {
        ChatOutcome::Failed(e) => {
            assert!(matches!(e, TtsError::Vocoder(_)));
            assert_eq!(e.kind(), ErrorKind::Synthesis);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(vocoder.call_count(), 2);
    assert_eq!(channel.events[0], Event::Text(1, ACK_REPLY.into()));
    assert_eq!(channel.events[1], Event::Deleted(1));
    let texts = channel.texts();
    assert!(texts[1].contains("vocoder ran out of memory"), "got: {}", texts[1]);
    assert!(!channel.events.iter().any(|e| matches!(e, Event::Audio { .. })));
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn chat_unwritable_audio_dir_fails_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(&dir.path().join("missing")));
    let mut channel = RecordingChannel::default();

    let outcome = bot.handle(&group("!herzog speak"), &mut channel).unwrap();

    match outcome {
        ChatOutcome::Failed(e) => assert!(matches!(e, TtsError::Write { .. })),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn chat_upload_failure_is_delivery_failure() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel { fail_audio: true, ..RecordingChannel::default() };

    let outcome = bot.handle(&group("!herzog speak"), &mut channel).unwrap();

    match outcome {
        ChatOutcome::DeliveryFailed(e) => assert_eq!(e.kind(), ErrorKind::Delivery),
        other => panic!("unexpected outcome: {:?}", other),
    }
    let texts = channel.texts();
    assert!(texts.contains(&SEND_ERROR_REPLY));
    assert!(!texts.contains(&FILE_ERROR_REPLY));
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn chat_long_text_is_split() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let bot = ChatBot::new(&synth, &config(dir.path()));
    let mut channel = RecordingChannel::default();

    let text = format!(
        "!herzog A short opening sentence. {}",
        "Then the jungle goes on and on ".repeat(5)
    );
    assert!(text.chars().count() >= 160);
    bot.handle(&group(&text), &mut channel).unwrap();
    assert_eq!(model.call_count(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Interactive prompt
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn repl_runs_until_exit_keyword() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::default();
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let repl = Repl::new(&synth, &config(dir.path()));

    let input = "Hello there\n   \nsecond line!\nEXIT\nnever read\n";
    let mut out = Vec::new();
    let summary = repl.run(input.as_bytes(), &mut out).unwrap();

    assert_eq!(summary, ReplSummary { synthesized: 2, failed: 1 });
    assert_eq!(model.call_count(), 2);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Enter text (or 'exit' to exit program):"));
    assert!(out.contains("Error: text is empty"));
    assert!(out.trim_end().ends_with("Exiting program..."));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn repl_stops_at_end_of_input_and_survives_errors() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::failing_on(0);
    let vocoder = FakeVocoder::default();
    let synth = Synthesizer::new(&model).with_vocoder(&vocoder);
    let repl = Repl::new(&synth, &config(dir.path()));

    let mut out = Vec::new();
    let summary = repl.run("boom\nfine\n".as_bytes(), &mut out).unwrap();

    assert_eq!(summary, ReplSummary { synthesized: 1, failed: 1 });
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Error: acoustic model inference failed"));
}
