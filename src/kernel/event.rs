use serde::Deserialize;
use tracing::debug;

use super::record::{Domain, TelemetryRecord};
use crate::services::control::{ControlOutcome, ControlRequest};

#[derive(Debug, Clone)]
pub enum Event {
    /// Pushed by the backend.
    Inbound(InboundMessage),
    /// Issued by the person at the console.
    Operator(OperatorCommand),
    /// Result of a control request the driver sent earlier.
    Control(ControlOutcome),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    DataUpdate { data: TelemetryRecord },
    AgentResponse { content: String },
}

impl InboundMessage {
    /// Malformed messages, unknown types and unknown domains all come back as `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!("Ignoring inbound message: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    SwitchDomain(Domain),
    TriggerCrisis,
    UpdateRules { value: i64 },
    Stabilize,
}

impl OperatorCommand {
    /// Console syntax: `domain <tag>`, `trigger`, `rules <value>`, `stabilize`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_ascii_lowercase();
        let arg = words.next();

        match verb.as_str() {
            "domain" | "switch" => arg.and_then(Domain::parse).map(OperatorCommand::SwitchDomain),
            "trigger" | "crisis" => Some(OperatorCommand::TriggerCrisis),
            "rules" => arg
                .and_then(|v| v.parse().ok())
                .map(|value| OperatorCommand::UpdateRules { value }),
            "stabilize" => Some(OperatorCommand::Stabilize),
            _ => None,
        }
    }

    pub fn to_request(&self, active: Domain) -> Option<ControlRequest> {
        match self {
            OperatorCommand::SwitchDomain(_) => None,
            OperatorCommand::TriggerCrisis => Some(ControlRequest::TriggerEvent { domain: active }),
            OperatorCommand::UpdateRules { value } => Some(ControlRequest::UpdateRules {
                domain: active,
                value: *value,
            }),
            OperatorCommand::Stabilize => Some(ControlRequest::Stabilize),
        }
    }
}
