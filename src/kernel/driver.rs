use tokio::sync::mpsc;
use tracing::{info, warn};

use super::event::Event;
use super::reactor::{Reactor, SideEffect};
use super::scheduler::NarrativePlayer;
use crate::outputs::agent_log::AgentLog;
use crate::outputs::console::{ConsoleRenderer, Presenter};
use crate::services::control::ControlClient;

/// Async harness around the reactor. Owns everything with I/O or timers.
pub struct Driver<P: Presenter = ConsoleRenderer> {
    reactor: Reactor,
    receiver: mpsc::Receiver<Event>,
    // Control outcomes are fed back through the input queue. Weak, so the
    // loop ends once the input side hangs up.
    tx: mpsc::WeakSender<Event>,
    player: NarrativePlayer,
    narrative_tx: mpsc::UnboundedSender<String>,
    narrative_rx: mpsc::UnboundedReceiver<String>,
    agent_log: AgentLog,
    control: ControlClient,
    presenter: P,
}

impl<P: Presenter> Driver<P> {
    pub fn new(
        reactor: Reactor,
        player: NarrativePlayer,
        agent_log: AgentLog,
        control: ControlClient,
        presenter: P,
        receiver: mpsc::Receiver<Event>,
        tx: mpsc::Sender<Event>,
    ) -> Self {
        let (narrative_tx, narrative_rx) = mpsc::unbounded_channel();
        Self {
            reactor,
            receiver,
            tx: tx.downgrade(),
            player,
            narrative_tx,
            narrative_rx,
            agent_log,
            control,
            presenter,
        }
    }

    /// Runs until every input sender is gone, then lets narratives already in
    /// flight play out. Returns the agent log; dropping it releases the voice.
    pub async fn run(mut self) -> AgentLog {
        info!("Dashboard active on {}", self.reactor.state.active_domain());
        self.presenter
            .header(self.reactor.state.active_domain(), self.reactor.state.stats());

        loop {
            tokio::select! {
                event = self.receiver.recv() => {
                    let Some(event) = event else { break };
                    let effects = self.reactor.step(vec![event]);
                    self.apply(effects);
                }
                Some(line) = self.narrative_rx.recv() => self.log(&line),
            }
        }

        let Driver {
            mut player,
            narrative_tx,
            mut narrative_rx,
            mut agent_log,
            mut presenter,
            ..
        } = self;
        info!("Input closed, finishing {} narrative playbacks", player.active_playbacks());

        // The channel closes once the last playback drops its sink.
        drop(narrative_tx);
        while let Some(line) = narrative_rx.recv().await {
            presenter.agent(agent_log.log(&line));
        }
        info!("Dashboard stopped");
        agent_log
    }

    fn apply(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::RenderFeed(item) => self.presenter.feed(&item),
                SideEffect::Narrate(script) => {
                    let id = self.player.play(script.into_lines(), self.narrative_tx.clone());
                    info!("Narrative playback {} started", id);
                }
                SideEffect::CancelNarration => {
                    let cancelled = self.player.cancel_all();
                    if cancelled > 0 {
                        info!("Cancelled {} stale narrative playbacks", cancelled);
                    }
                }
                SideEffect::Log(text) => self.log(&text),
                SideEffect::SendControl(request) => {
                    let Some(tx) = self.tx.upgrade() else {
                        warn!("Input closed, dropping control request {}", request.path());
                        continue;
                    };
                    let client = self.control.clone();
                    tokio::spawn(async move {
                        let outcome = client.dispatch(request).await;
                        if tx.send(Event::Control(outcome)).await.is_err() {
                            warn!("Dashboard gone before control outcome arrived");
                        }
                    });
                }
                SideEffect::Notify(text) => self.presenter.notice(&text),
                SideEffect::Retheme(domain) => self.presenter.header(domain, self.reactor.state.stats()),
            }
        }
    }

    fn log(&mut self, text: &str) {
        let entry = self.agent_log.log(text);
        self.presenter.agent(entry);
    }
}
