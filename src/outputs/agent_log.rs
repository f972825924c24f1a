use std::collections::VecDeque;

use super::speech::{is_voice_worthy, SpeechQueue};

const MAX_ENTRIES: usize = 200;

/// The agent panel: every narrative line, agent response and operator
/// confirmation ends up here, and voice-worthy ones are also spoken.
#[derive(Debug, Default)]
pub struct AgentLog {
    entries: VecDeque<String>,
    voice: Option<SpeechQueue>,
}

impl AgentLog {
    pub fn new(voice: Option<SpeechQueue>) -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_ENTRIES),
            voice,
        }
    }

    /// Records the line and returns the entry as displayed.
    pub fn log(&mut self, text: &str) -> &str {
        if let Some(voice) = &self.voice {
            if is_voice_worthy(text) {
                voice.enqueue(text);
            }
        }

        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(format!("> {}", text));
        &self.entries[0]
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
