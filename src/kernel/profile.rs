//! Per-domain strategy table.
//!
//! Every domain-specific decision (which triggers apply, which narrative to
//! play, how the header and rule editor look) is looked up here instead of
//! branching on the domain at each call site.

use super::classifier::{self, Trigger};
use super::narrative::{self, NarrativeScript};
use super::record::{Domain, TelemetryRecord};

/// Header text shown while a domain is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub primary_stat: &'static str,
    pub rate_stat: &'static str,
}

/// The threshold an operator can push to the backend for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleKnob {
    pub title: &'static str,
    /// Field name in the `/update-rules` body.
    pub field: &'static str,
    pub default_value: i64,
}

pub struct DomainProfile {
    pub domain: Domain,
    pub display: DisplayConfig,
    pub rule: RuleKnob,
    pub triggers: fn(&TelemetryRecord) -> Vec<Trigger>,
    pub narrate: fn(&TelemetryRecord) -> NarrativeScript,
}

static PROFILES: [DomainProfile; 3] = [
    DomainProfile {
        domain: Domain::Finance,
        display: DisplayConfig {
            title: "Market Intelligence",
            subtitle: "Real-time algorithmic trading surveillance.",
            primary_stat: "Active Symbols",
            rate_stat: "Ticks / Sec",
        },
        rule: RuleKnob {
            title: "MAX DRAWDOWN (%)",
            field: "max_drawdown",
            default_value: 5,
        },
        triggers: classifier::finance_triggers,
        narrate: narrative::finance_narrative,
    },
    DomainProfile {
        domain: Domain::Healthcare,
        display: DisplayConfig {
            title: "Patient Vitals Matrix",
            subtitle: "ICU Telemetry & Early Warning System.",
            primary_stat: "Patients Monitored",
            rate_stat: "Vitals / Min",
        },
        rule: RuleKnob {
            title: "MAX BPM",
            field: "max_bpm",
            default_value: 140,
        },
        triggers: classifier::healthcare_triggers,
        narrate: narrative::healthcare_narrative,
    },
    DomainProfile {
        domain: Domain::Devops,
        display: DisplayConfig {
            title: "DevOps Sentinel",
            subtitle: "Microservices Log Aggregation & Analysis.",
            primary_stat: "Services Online",
            rate_stat: "Logs / Sec",
        },
        rule: RuleKnob {
            title: "MAX LATENCY (MS)",
            field: "max_latency",
            default_value: 2000,
        },
        triggers: classifier::devops_triggers,
        narrate: narrative::devops_narrative,
    },
];

pub fn profile(domain: Domain) -> &'static DomainProfile {
    match domain {
        Domain::Finance => &PROFILES[0],
        Domain::Healthcare => &PROFILES[1],
        Domain::Devops => &PROFILES[2],
    }
}
