use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use synaptix::error::SpeechError;
use synaptix::kernel::driver::Driver;
use synaptix::kernel::event::{Event, InboundMessage, OperatorCommand};
use synaptix::kernel::reactor::{Reactor, CRISIS_FAILED_NOTICE};
use synaptix::kernel::record::Domain;
use synaptix::kernel::scheduler::{NarrativePlayer, NARRATIVE_INTERVAL};
use synaptix::kernel::state::SessionStats;
use synaptix::outputs::agent_log::AgentLog;
use synaptix::outputs::console::Presenter;
use synaptix::outputs::feed::FeedItem;
use synaptix::outputs::speech::{SpeechQueue, Voice};
use synaptix::services::control::ControlClient;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};

const CRASH_TICK: &str = r#"{"type":"data_update","data":{"domain":"finance","timestamp":"2024-05-01T09:30:00.125","symbol":"CRASH","price":12.5,"delta":-25.0}}"#;

const CRASH_SCRIPT: [&str; 6] = [
    "> ⚠ MARKET ALERT: CRASH Plunge Detected",
    "> Querying Historical Volatility Index...",
    "> Correlation found with 'Liquidity Crunch'",
    "> ACTION: Halted Trading for CRASH",
    "> ACTION: Injecting Emergency Liquidity",
    "> ✔ THREAT NEUTRALIZED: Volatility Stabilized",
];

/// Captures what the console would show, agent lines stamped with their offset.
#[derive(Clone)]
struct Screen {
    origin: Instant,
    headers: Arc<Mutex<Vec<Domain>>>,
    feed: Arc<Mutex<Vec<FeedItem>>>,
    agent: Arc<Mutex<Vec<(String, Duration)>>>,
    notices: Arc<Mutex<Vec<String>>>,
}

impl Screen {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            headers: Arc::default(),
            feed: Arc::default(),
            agent: Arc::default(),
            notices: Arc::default(),
        }
    }

    fn agent_lines(&self) -> Vec<String> {
        self.agent.lock().unwrap().iter().map(|(line, _)| line.clone()).collect()
    }
}

impl Presenter for Screen {
    fn header(&mut self, domain: Domain, _stats: SessionStats) {
        self.headers.lock().unwrap().push(domain);
    }

    fn feed(&mut self, item: &FeedItem) {
        self.feed.lock().unwrap().push(item.clone());
    }

    fn agent(&mut self, entry: &str) {
        self.agent.lock().unwrap().push((entry.to_string(), self.origin.elapsed()));
    }

    fn notice(&mut self, text: &str) {
        self.notices.lock().unwrap().push(text.to_string());
    }
}

/// Speaks slower than the narrative plays, so a backlog is still queued when input ends.
#[derive(Clone, Default)]
struct SlowVoice {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl Voice for SlowVoice {
    async fn utter(&mut self, text: &str) -> Result<(), SpeechError> {
        sleep(Duration::from_millis(1500)).await;
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn dashboard(screen: &Screen, voice: Option<SpeechQueue>) -> (Driver<Screen>, mpsc::Sender<Event>) {
    let (tx, rx) = mpsc::channel(16);
    let control = ControlClient::new(format!("http://127.0.0.1:{}", closed_port()), Duration::from_millis(500));
    let driver = Driver::new(
        Reactor::default(),
        NarrativePlayer::default(),
        AgentLog::new(voice),
        control,
        screen.clone(),
        rx,
        tx.clone(),
    );
    (driver, tx)
}

fn crash_tick() -> Event {
    Event::Inbound(InboundMessage::parse(CRASH_TICK).unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_narrative_reaches_agent_log_at_fixed_offsets() {
    let screen = Screen::new();
    let (driver, tx) = dashboard(&screen, None);

    tx.send(crash_tick()).await.unwrap();
    drop(tx);
    let log = driver.run().await;

    let expected: Vec<(String, Duration)> = CRASH_SCRIPT
        .iter()
        .enumerate()
        .map(|(i, line)| (line.to_string(), NARRATIVE_INTERVAL * i as u32))
        .collect();
    assert_eq!(*screen.agent.lock().unwrap(), expected);

    assert_eq!(log.len(), CRASH_SCRIPT.len());
    assert_eq!(log.latest(), Some(CRASH_SCRIPT[5]));

    let feed = screen.feed.lock().unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].critical);
    assert_eq!(*screen.headers.lock().unwrap(), vec![Domain::Finance]);
}

#[tokio::test(start_paused = true)]
async fn test_domain_switch_stops_stale_narrative() {
    let screen = Screen::new();
    let (driver, tx) = dashboard(&screen, None);
    let running = tokio::spawn(driver.run());

    tx.send(crash_tick()).await.unwrap();
    sleep(Duration::from_millis(1000)).await;
    tx.send(Event::Operator(OperatorCommand::SwitchDomain(Domain::Healthcare)))
        .await
        .unwrap();
    drop(tx);
    running.await.unwrap();

    assert_eq!(screen.agent_lines(), CRASH_SCRIPT[..2].to_vec());
    assert_eq!(*screen.headers.lock().unwrap(), vec![Domain::Finance, Domain::Healthcare]);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_backend_raises_notice() {
    let screen = Screen::new();
    let (driver, tx) = dashboard(&screen, None);
    let running = tokio::spawn(driver.run());

    tx.send(Event::Operator(OperatorCommand::TriggerCrisis)).await.unwrap();
    // Past the client timeout, so the outcome is back whether the connect was
    // refused or timed out.
    sleep(Duration::from_secs(1)).await;
    assert_eq!(*screen.notices.lock().unwrap(), vec![CRISIS_FAILED_NOTICE.to_string()]);

    drop(tx);
    running.await.unwrap();
    assert!(screen.agent_lines().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_input_end_lets_narrative_and_voice_finish() {
    let voice = SlowVoice::default();
    let spoken = voice.spoken.clone();
    let (queue, worker) = SpeechQueue::spawn(voice);
    let screen = Screen::new();
    let (driver, tx) = dashboard(&screen, Some(queue));

    tx.send(crash_tick()).await.unwrap();
    drop(tx);
    drop(driver.run().await);
    worker.await.unwrap();

    assert_eq!(screen.agent_lines(), CRASH_SCRIPT.to_vec());
    assert_eq!(
        *spoken.lock().unwrap(),
        vec![
            "MARKET ALERT: CRASH Plunge Detected",
            "ACTION: Halted Trading for CRASH",
            "ACTION: Injecting Emergency Liquidity",
            "THREAT NEUTRALIZED: Volatility Stabilized",
        ]
    );
}
