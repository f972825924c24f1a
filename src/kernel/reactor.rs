use tracing::{debug, info};

use super::classifier::classify;
use super::event::{Event, InboundMessage, OperatorCommand};
use super::narrative::{generate_narrative, NarrativeScript};
use super::record::{Domain, TelemetryRecord};
use super::state::{SessionState, StateDelta, DEFAULT_FEED_CAPACITY};
use crate::outputs::feed::FeedItem;
use crate::services::control::{ControlOutcome, ControlRequest};

pub const CRISIS_FAILED_NOTICE: &str = "Connection Failed! Please restart the backend.";
pub const RULES_FAILED_NOTICE: &str = "Update Failed";
pub const STABILIZE_FAILED_NOTICE: &str = "Stabilization request failed";

/// What the driver must do after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    RenderFeed(FeedItem),
    /// Play a remediation narrative through the delayed player.
    Narrate(NarrativeScript),
    /// Drop every pending narrative line.
    CancelNarration,
    /// Write a line to the agent log immediately.
    Log(String),
    SendControl(ControlRequest),
    /// Blocking operator notification.
    Notify(String),
    /// Redraw the header for a newly selected domain.
    Retheme(Domain),
}

#[derive(Debug, Clone)]
pub struct ReactorConfig {
    pub initial_domain: Domain,
    pub feed_capacity: usize,
    /// Stop stale narratives when the operator changes domain.
    pub cancel_on_domain_switch: bool,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            initial_domain: Domain::Finance,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            cancel_on_domain_switch: true,
        }
    }
}

/// Session processor. `step` is synchronous and never touches I/O or timers;
/// everything observable leaves as a `SideEffect`.
pub struct Reactor {
    pub state: SessionState,
    config: ReactorConfig,
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new(ReactorConfig::default())
    }
}

impl Reactor {
    pub fn new(config: ReactorConfig) -> Self {
        Self {
            state: SessionState::new(config.initial_domain, config.feed_capacity),
            config,
        }
    }

    pub fn step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for event in events {
            match event {
                Event::Inbound(InboundMessage::DataUpdate { data }) => self.on_record(data, &mut effects),
                Event::Inbound(InboundMessage::AgentResponse { content }) => effects.push(SideEffect::Log(content)),
                Event::Operator(command) => self.on_command(command, &mut effects),
                Event::Control(outcome) => self.on_outcome(outcome, &mut effects),
            }
        }
        effects
    }

    fn on_record(&mut self, record: TelemetryRecord, effects: &mut Vec<SideEffect>) {
        let Some(verdict) = classify(&record, self.state.active_domain()) else {
            debug!("Ignoring {} record while {} is active", record.domain(), self.state.active_domain());
            return;
        };

        let critical = verdict.is_critical();
        let item = FeedItem::render(&record, critical);
        self.state.reduce(StateDelta::RecordAccepted { item: item.clone() });

        if critical {
            info!("Critical {} event: {:?}", record.domain(), verdict.triggers);
            effects.push(SideEffect::Narrate(generate_narrative(&record)));
        }
        effects.push(SideEffect::RenderFeed(item));
    }

    fn on_command(&mut self, command: OperatorCommand, effects: &mut Vec<SideEffect>) {
        let active = self.state.active_domain();
        match command {
            OperatorCommand::SwitchDomain(domain) => {
                info!("Switching domain {} -> {}", active, domain);
                self.state.reduce(StateDelta::DomainSwitched(domain));
                if self.config.cancel_on_domain_switch {
                    effects.push(SideEffect::CancelNarration);
                }
                effects.push(SideEffect::Retheme(domain));
            }
            OperatorCommand::TriggerCrisis if self.state.crisis_in_flight() => {
                debug!("Crisis request already in flight, ignoring");
            }
            other => {
                if let Some(request) = other.to_request(active) {
                    if matches!(request, ControlRequest::TriggerEvent { .. }) {
                        self.state.reduce(StateDelta::CrisisRequested);
                    }
                    effects.push(SideEffect::SendControl(request));
                }
            }
        }
    }

    fn on_outcome(&mut self, outcome: ControlOutcome, effects: &mut Vec<SideEffect>) {
        let succeeded = outcome.is_success();
        match outcome.request {
            ControlRequest::TriggerEvent { .. } => {
                self.state.reduce(StateDelta::CrisisSettled);
                if !succeeded {
                    effects.push(SideEffect::Notify(CRISIS_FAILED_NOTICE.to_string()));
                }
            }
            ControlRequest::UpdateRules { domain, value } => {
                if succeeded {
                    effects.push(SideEffect::Log(format!(
                        "RULE UPDATE: Threshold set to {} for {}",
                        value,
                        domain.ui_tag().to_uppercase()
                    )));
                    effects.push(SideEffect::Log("System adapting to new constraints...".to_string()));
                } else {
                    effects.push(SideEffect::Notify(RULES_FAILED_NOTICE.to_string()));
                }
            }
            ControlRequest::Stabilize => {
                if succeeded {
                    effects.push(SideEffect::Log(
                        "MANUAL OVERRIDE: System Stabilization Sequence Initiated...".to_string(),
                    ));
                } else {
                    effects.push(SideEffect::Notify(STABILIZE_FAILED_NOTICE.to_string()));
                }
            }
        }
    }
}
