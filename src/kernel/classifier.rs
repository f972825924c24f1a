use super::profile::profile;
use super::record::{Domain, Level, Payload, Status, TelemetryRecord};

/// Symbols that are critical on sight.
pub const CRASH_SYMBOLS: [&str; 4] = ["CRASH", "CIRCUIT-BREAKER", "QUANTUM", "FLASH-CRASH"];
/// Headline keywords, matched case-sensitively.
pub const NEWS_KEYWORDS: [&str; 2] = ["CRASH", "Halt"];
/// Percent change at or below which a tick is a plunge.
pub const DRAWDOWN_LIMIT: f64 = -10.0;
pub const BPM_CEILING: f64 = 140.0;
pub const BPM_FLOOR: f64 = 40.0;
pub const SPO2_FLOOR: f64 = 90.0;
pub const CODE_BLUE: &str = "CODE BLUE";

/// A rule that fired for a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    StatusCritical,
    SevereLevel(Level),
    ManualOverride,
    WatchlistSymbol(String),
    Drawdown(f64),
    NewsKeyword(&'static str),
    Tachycardia(f64),
    Bradycardia(f64),
    Desaturation(f64),
    CodeBlue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub triggers: Vec<Trigger>,
}

impl Classification {
    pub fn is_critical(&self) -> bool {
        !self.triggers.is_empty()
    }
}

/// Domain filter: records for other domains are not considered at all.
pub fn admits(record: &TelemetryRecord, active: Domain) -> bool {
    record.domain() == active
}

/// `None` when the record belongs to another domain.
pub fn classify(record: &TelemetryRecord, active: Domain) -> Option<Classification> {
    if !admits(record, active) {
        return None;
    }
    Some(evaluate(record))
}

/// Unfiltered predicate: universal triggers plus the record domain's own.
pub fn evaluate(record: &TelemetryRecord) -> Classification {
    let mut triggers = universal_triggers(record);
    triggers.extend((profile(record.domain()).triggers)(record));
    Classification { triggers }
}

pub fn is_critical(record: &TelemetryRecord) -> bool {
    evaluate(record).is_critical()
}

fn universal_triggers(record: &TelemetryRecord) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if record.status == Some(Status::Critical) {
        triggers.push(Trigger::StatusCritical);
    }
    if let Some(level @ (Level::Error | Level::Fatal)) = &record.level {
        triggers.push(Trigger::SevereLevel(level.clone()));
    }
    if record.is_manual {
        triggers.push(Trigger::ManualOverride);
    }
    triggers
}

pub(crate) fn finance_triggers(record: &TelemetryRecord) -> Vec<Trigger> {
    let Payload::Finance(tick) = &record.payload else {
        return Vec::new();
    };
    let mut triggers = Vec::new();

    if let Some(symbol) = tick.symbol.as_deref() {
        if CRASH_SYMBOLS.contains(&symbol) {
            triggers.push(Trigger::WatchlistSymbol(symbol.to_string()));
        }
    }
    // NaN never compares true, so unparseable deltas fall through.
    if let Some(delta) = tick.delta.filter(|d| *d <= DRAWDOWN_LIMIT) {
        triggers.push(Trigger::Drawdown(delta));
    }
    if let Some(news) = tick.news.as_deref() {
        triggers.extend(
            NEWS_KEYWORDS
                .into_iter()
                .filter(|k| news.contains(k))
                .map(Trigger::NewsKeyword),
        );
    }
    triggers
}

pub(crate) fn healthcare_triggers(record: &TelemetryRecord) -> Vec<Trigger> {
    let Payload::Healthcare(vitals) = &record.payload else {
        return Vec::new();
    };
    let mut triggers = Vec::new();

    if let Some(bpm) = vitals.bpm {
        if bpm > BPM_CEILING {
            triggers.push(Trigger::Tachycardia(bpm));
        } else if bpm < BPM_FLOOR {
            triggers.push(Trigger::Bradycardia(bpm));
        }
    }
    if let Some(spo2) = vitals.spo2.filter(|s| *s < SPO2_FLOOR) {
        triggers.push(Trigger::Desaturation(spo2));
    }
    if vitals.notes.as_deref().is_some_and(|n| n.contains(CODE_BLUE)) {
        triggers.push(Trigger::CodeBlue);
    }
    triggers
}

/// Devops relies on the universal level check alone.
pub(crate) fn devops_triggers(_record: &TelemetryRecord) -> Vec<Trigger> {
    Vec::new()
}
