use super::profile::profile;
use super::record::{Payload, TelemetryRecord};

/// Ordered remediation lines for one critical event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativeScript {
    lines: Vec<String>,
}

impl NarrativeScript {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// (keyword, action, drug). Checked in order, first match wins.
const CARE_PROTOCOLS: [(&str, &str, &str); 3] = [
    ("Cardiac", "Charging Defibrillator", "Epinephrine"),
    ("Hypoxia", "Checking Airway Obstruction", "100% Oxygen"),
    ("Seizure", "Securing Patient", "Diazepam"),
];
const DEFAULT_CARE: (&str, &str) = ("Administering General Protocol", "Stabilizers");

// (keyword, fix, root cause). Checked in order, first match wins.
const RUNBOOK: [(&str, &str, &str); 3] = [
    ("Memory", "Triggering Heap Dump & GC", "Memory Leak in Worker"),
    ("Database", "Rolling Back Transaction", "Write Conflict"),
    ("Unauthorized", "Closing Socket Connection", "Intrusion Attempt"),
];
const DEFAULT_RUNBOOK: (&str, &str) = ("Restarting Container", "Unknown");

/// Only meaningful for records the classifier marked critical.
pub fn generate_narrative(record: &TelemetryRecord) -> NarrativeScript {
    (profile(record.domain()).narrate)(record)
}

/// Care protocol `(action, drug)` for a diagnosis text.
pub fn care_protocol(issue: &str) -> (&'static str, &'static str) {
    CARE_PROTOCOLS
        .iter()
        .find(|(keyword, _, _)| issue.contains(keyword))
        .map(|(_, action, drug)| (*action, *drug))
        .unwrap_or(DEFAULT_CARE)
}

/// Runbook entry `(fix, root cause)` for an error message.
pub fn runbook_entry(error: &str) -> (&'static str, &'static str) {
    RUNBOOK
        .iter()
        .find(|(keyword, _, _)| error.contains(keyword))
        .map(|(_, fix, cause)| (*fix, *cause))
        .unwrap_or(DEFAULT_RUNBOOK)
}

pub(crate) fn finance_narrative(record: &TelemetryRecord) -> NarrativeScript {
    let symbol = match &record.payload {
        Payload::Finance(tick) => tick.symbol.as_deref(),
        _ => None,
    }
    .filter(|s| !s.is_empty())
    .unwrap_or("UNKNOWN");

    NarrativeScript::new(vec![
        format!("⚠ MARKET ALERT: {symbol} Plunge Detected"),
        "Querying Historical Volatility Index...".to_string(),
        "Correlation found with 'Liquidity Crunch'".to_string(),
        format!("ACTION: Halted Trading for {symbol}"),
        "ACTION: Injecting Emergency Liquidity".to_string(),
        "✔ THREAT NEUTRALIZED: Volatility Stabilized".to_string(),
    ])
}

pub(crate) fn healthcare_narrative(record: &TelemetryRecord) -> NarrativeScript {
    let (patient, notes) = match &record.payload {
        Payload::Healthcare(vitals) => (vitals.patient_id.as_deref(), vitals.notes.as_deref()),
        _ => (None, None),
    };
    let patient = patient.filter(|s| !s.is_empty()).unwrap_or("PATIENT");
    let issue = notes.filter(|s| !s.is_empty()).unwrap_or("Vitals Critical");
    let (action, drug) = care_protocol(issue);

    NarrativeScript::new(vec![
        format!("⚠ CODE BLUE: {patient} - {issue}"),
        "Retrieving Patient History...".to_string(),
        format!("Diagnosed condition: {issue}"),
        format!("ACTION: {action}"),
        format!("ACTION: Administering {drug}"),
        "✔ PATIENT STABLE: Vitals Returning to Normal".to_string(),
    ])
}

pub(crate) fn devops_narrative(record: &TelemetryRecord) -> NarrativeScript {
    let (service, message) = match &record.payload {
        Payload::Devops(line) => (line.service.as_deref(), line.message.as_deref()),
        _ => (None, None),
    };
    let service = service.filter(|s| !s.is_empty()).unwrap_or("System");
    let error = message.filter(|s| !s.is_empty()).unwrap_or("Fatal Error");
    let (fix, root_cause) = runbook_entry(error);

    NarrativeScript::new(vec![
        format!("⚠ SYSTEM FAILURE: {service}"),
        format!("Error: {error}"),
        format!("Root Cause Analysis: {root_cause}"),
        "ACTION: Isolating process...".to_string(),
        format!("ACTION: {fix}"),
        "✔ RESOLUTION COMPLETE: Service Online".to_string(),
    ])
}
