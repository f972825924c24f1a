use std::collections::HashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::scheduler::PlaybackId;

struct Playback {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Tracks in-flight narrative playbacks so they can be stopped by id or all at once.
/// Lives on the driver task; the spawned playbacks only ever see their own token.
#[derive(Default)]
pub struct CancellationRegistry {
    active: HashMap<PlaybackId, Playback>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: PlaybackId, token: CancellationToken, handle: JoinHandle<()>) {
        self.prune();
        self.active.insert(id, Playback { token, handle });
    }

    /// Returns false when the playback already finished or was never registered.
    pub fn cancel(&mut self, id: PlaybackId) -> bool {
        match self.active.remove(&id) {
            Some(playback) if !playback.handle.is_finished() => {
                playback.token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Cancels every pending playback and returns how many were still running.
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for (_, playback) in self.active.drain() {
            if !playback.handle.is_finished() {
                playback.token.cancel();
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Drops playbacks whose deliveries have all fired.
    pub fn prune(&mut self) {
        self.active.retain(|_, playback| !playback.handle.is_finished());
    }

    pub fn active_count(&mut self) -> usize {
        self.prune();
        self.active.len()
    }
}
