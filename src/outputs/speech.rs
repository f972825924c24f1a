use std::future::Future;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::SpeechError;

/// Lines containing any of these (case-insensitive) are read aloud.
pub const VOICE_KEYWORDS: [&str; 17] = [
    "action",
    "alert",
    "critical",
    "auto-protocol",
    "threat",
    "code",
    "blue",
    "failure",
    "crash",
    "error",
    "root",
    "cause",
    "diagnosed",
    "market",
    "plunge",
    "system",
    "fatal",
];

const UNSPOKEN: [char; 3] = ['⚠', '✔', '>'];

pub fn is_voice_worthy(text: &str) -> bool {
    let lower = text.to_lowercase();
    VOICE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Strips glyphs that read badly aloud.
pub fn utterance(text: &str) -> String {
    text.chars()
        .filter(|c| !UNSPOKEN.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Something that can say one line and report when it is done.
pub trait Voice: Send + 'static {
    fn utter(&mut self, text: &str) -> impl Future<Output = Result<(), SpeechError>> + Send;
}

/// Speaks through an external program, text passed as the last argument.
#[derive(Debug, Clone)]
pub struct CommandVoice {
    program: String,
    args: Vec<String>,
}

impl CommandVoice {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Voice for CommandVoice {
    async fn utter(&mut self, text: &str) -> Result<(), SpeechError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Exit { code: status.code() })
        }
    }
}

/// FIFO of utterances played strictly one after another.
#[derive(Debug, Clone)]
pub struct SpeechQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl SpeechQueue {
    /// Spawns the worker. It stops once every queue handle is dropped.
    pub fn spawn<V: Voice>(voice: V) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(drain(rx, voice));
        (Self { tx }, handle)
    }

    /// Queues the raw line; cleanup happens on the worker.
    pub fn enqueue(&self, text: impl Into<String>) {
        if self.tx.send(text.into()).is_err() {
            debug!("Speech worker gone, dropping utterance");
        }
    }
}

async fn drain<V: Voice>(mut rx: mpsc::UnboundedReceiver<String>, mut voice: V) {
    while let Some(raw) = rx.recv().await {
        let text = utterance(&raw);
        if text.is_empty() {
            continue;
        }
        if let Err(e) = voice.utter(&text).await {
            warn!("TTS failed, skipping utterance: {}", e);
        }
    }
}
