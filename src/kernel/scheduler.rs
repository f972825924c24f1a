use std::fmt;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::cancel::CancellationRegistry;

/// Gap between consecutive narrative lines.
pub const NARRATIVE_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(Uuid);

impl PlaybackId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Receives narrative lines one at a time.
pub trait NarrativeSink: Send + 'static {
    /// Returns false once nobody is listening; the rest of the playback is dropped.
    fn deliver(&self, line: String) -> bool;
}

impl NarrativeSink for mpsc::UnboundedSender<String> {
    fn deliver(&self, line: String) -> bool {
        self.send(line).is_ok()
    }
}

/// Delayed narrative player.
///
/// Each `play` spawns one timer task that delivers line `i` at
/// `start + i * interval`. Playbacks run independently, so overlapping calls
/// interleave at the sink while each keeps its own order.
pub struct NarrativePlayer {
    interval: Duration,
    registry: CancellationRegistry,
}

impl Default for NarrativePlayer {
    fn default() -> Self {
        Self::new(NARRATIVE_INTERVAL)
    }
}

impl NarrativePlayer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            registry: CancellationRegistry::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Must be called from within a tokio runtime.
    pub fn play<S: NarrativeSink>(&mut self, lines: Vec<String>, sink: S) -> PlaybackId {
        let id = PlaybackId::new();
        let token = CancellationToken::new();
        let start = Instant::now();
        let interval = self.interval;

        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            for (i, line) in lines.into_iter().enumerate() {
                let deadline = start + interval * i as u32;
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        debug!("Playback {} cancelled before line {}", id, i);
                        return;
                    }
                    _ = sleep_until(deadline) => {}
                }
                if !sink.deliver(line) {
                    debug!("Playback {} sink closed, dropping remaining lines", id);
                    return;
                }
            }
        });

        self.registry.register(id, token, handle);
        id
    }

    pub fn cancel(&mut self, id: PlaybackId) -> bool {
        self.registry.cancel(id)
    }

    pub fn cancel_all(&mut self) -> usize {
        self.registry.cancel_all()
    }

    pub fn active_playbacks(&mut self) -> usize {
        self.registry.active_count()
    }
}
