use std::sync::{Arc, Mutex};
use synaptix::kernel::scheduler::{NarrativePlayer, NarrativeSink, NARRATIVE_INTERVAL};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Records each delivery with its offset from a fixed origin.
#[derive(Clone)]
struct Stamped {
    origin: Instant,
    seen: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl NarrativeSink for Stamped {
    fn deliver(&self, line: String) -> bool {
        self.seen.lock().unwrap().push((line, self.origin.elapsed()));
        true
    }
}

#[tokio::test(start_paused = true)]
async fn test_lines_arrive_at_fixed_offsets() {
    let mut player = NarrativePlayer::default();
    let sink = Stamped {
        origin: Instant::now(),
        seen: Arc::new(Mutex::new(Vec::new())),
    };

    player.play(lines(&["a", "b", "c"]), sink.clone());
    sleep(Duration::from_secs(5)).await;

    let seen = sink.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("a".to_string(), Duration::ZERO),
            ("b".to_string(), NARRATIVE_INTERVAL),
            ("c".to_string(), NARRATIVE_INTERVAL * 2),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_interval_over_channel() {
    let mut player = NarrativePlayer::new(Duration::from_millis(250));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();

    player.play(lines(&["one", "two"]), tx);

    assert_eq!(rx.recv().await.as_deref(), Some("one"));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(rx.recv().await.as_deref(), Some("two"));
    assert_eq!(start.elapsed(), Duration::from_millis(250));
    // Sender moved into the playback, so the channel closes when it finishes.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_playbacks_interleave_but_keep_their_own_order() {
    let mut player = NarrativePlayer::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    player.play(lines(&["a1", "a2", "a3"]), tx.clone());
    sleep(Duration::from_millis(400)).await;
    player.play(lines(&["b1", "b2", "b3"]), tx.clone());
    drop(tx);

    let mut received = Vec::new();
    while let Some(line) = rx.recv().await {
        received.push(line);
    }
    assert_eq!(received, vec!["a1", "b1", "a2", "b2", "a3", "b3"]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_stops_pending_lines() {
    let mut player = NarrativePlayer::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    player.play(lines(&["a", "b", "c"]), tx.clone());
    assert_eq!(rx.recv().await.as_deref(), Some("a"));
    assert_eq!(player.active_playbacks(), 1);

    assert_eq!(player.cancel_all(), 1);
    sleep(Duration::from_secs(5)).await;

    assert!(rx.try_recv().is_err());
    assert_eq!(player.active_playbacks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_by_id_leaves_other_playbacks() {
    let mut player = NarrativePlayer::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let stale = player.play(lines(&["old1", "old2"]), tx.clone());
    let _fresh = player.play(lines(&["new1", "new2"]), tx.clone());
    drop(tx);

    assert!(player.cancel(stale));
    assert!(!player.cancel(stale), "second cancel is a no-op");

    let mut received = Vec::new();
    while let Some(line) = rx.recv().await {
        received.push(line);
    }
    assert_eq!(received, vec!["new1", "new2"]);
}

#[tokio::test(start_paused = true)]
async fn test_closed_sink_drops_silently() {
    let mut player = NarrativePlayer::default();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    drop(rx);

    player.play(lines(&["a", "b"]), tx);
    sleep(Duration::from_secs(2)).await;

    assert_eq!(player.active_playbacks(), 0);
}
