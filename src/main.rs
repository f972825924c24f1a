use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use synaptix::config::{CliOverrides, Config};
use synaptix::kernel::driver::Driver;
use synaptix::kernel::event::{Event, InboundMessage, OperatorCommand};
use synaptix::kernel::reactor::Reactor;
use synaptix::kernel::record::Domain;
use synaptix::kernel::scheduler::NarrativePlayer;
use synaptix::outputs::agent_log::AgentLog;
use synaptix::outputs::console::ConsoleRenderer;
use synaptix::outputs::speech::{CommandVoice, SpeechQueue};
use synaptix::services::control::ControlClient;

/// Live telemetry dashboard. Reads backend messages as JSON lines on stdin;
/// any other line is an operator command.
#[derive(Debug, Parser)]
#[command(name = "synaptix", version)]
struct Args {
    /// Config file (defaults to ./synaptix.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial domain: finance, health, dev.
    #[arg(long, value_parser = parse_domain)]
    domain: Option<Domain>,

    /// Backend base URL for control requests.
    #[arg(long)]
    backend: Option<String>,

    /// Read voice-worthy agent lines aloud.
    #[arg(long)]
    voice: bool,
}

fn parse_domain(tag: &str) -> Result<Domain, String> {
    Domain::parse(tag).ok_or_else(|| format!("unknown domain '{}'", tag))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let args = Args::parse();
    let overrides = CliOverrides {
        domain: args.domain,
        backend_url: args.backend,
        voice: args.voice.then_some(true),
    };
    let config = Config::load(args.config.as_deref(), Some(&overrides)).context("loading configuration")?;
    tracing::info!("Synaptix dashboard booting (backend {})", config.backend.url);

    let (voice, speech_worker) = if config.voice.enabled {
        let (queue, worker) = SpeechQueue::spawn(CommandVoice::new(&config.voice.program, config.voice.args.clone()));
        (Some(queue), Some(worker))
    } else {
        (None, None)
    };

    let (tx, rx) = mpsc::channel(100);
    let driver = Driver::new(
        Reactor::new(config.reactor()),
        NarrativePlayer::new(config.narrative_interval()),
        AgentLog::new(voice),
        ControlClient::new(&config.backend.url, config.request_timeout()),
        ConsoleRenderer,
        rx,
        tx.clone(),
    );

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = if line.starts_with('{') {
                match InboundMessage::parse(line) {
                    Some(message) => Event::Inbound(message),
                    None => continue,
                }
            } else {
                match OperatorCommand::parse(line) {
                    Some(command) => Event::Operator(command),
                    None => {
                        tracing::warn!("Unknown command '{}' (try: domain <tag>, trigger, rules <n>, stabilize)", line);
                        continue;
                    }
                }
            };

            if let Err(e) = tx.send(event).await {
                tracing::error!("Failed to send input: {}", e);
                break;
            }
        }
    });

    let agent_log = driver.run().await;
    tracing::info!("Session ended with {} agent log entries", agent_log.len());

    // Last queue handle goes with the log; the worker then finishes what is queued.
    drop(agent_log);
    if let Some(worker) = speech_worker {
        worker.await.context("speech worker failed")?;
    }
    Ok(())
}
