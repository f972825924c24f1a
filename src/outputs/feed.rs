use std::fmt;

use crate::kernel::record::{Domain, Payload, TelemetryRecord};

/// One row of the scrolling feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub domain: Domain,
    pub time: String,
    pub headline: String,
    pub detail: String,
    pub critical: bool,
}

impl FeedItem {
    pub fn render(record: &TelemetryRecord, critical: bool) -> Self {
        let (headline, detail) = match &record.payload {
            Payload::Finance(tick) => (
                text_or_blank(tick.symbol.as_deref()),
                format!("${} ({})", number_or_blank(tick.price), number_or_blank(tick.delta)),
            ),
            Payload::Healthcare(vitals) => (
                text_or_blank(vitals.patient_id.as_deref()),
                format!(
                    "BPM: {} | SpO2: {}%",
                    number_or_blank(vitals.bpm),
                    number_or_blank(vitals.spo2)
                ),
            ),
            Payload::Devops(line) => (
                text_or_blank(line.service.as_deref()),
                text_or_blank(line.message.as_deref()),
            ),
        };

        Self {
            domain: record.domain(),
            time: clock_time(&record.timestamp).to_string(),
            headline,
            detail,
            critical,
        }
    }
}

impl fmt::Display for FeedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.critical { "!!" } else { "  " };
        write!(f, "{} {}  {:<16} {}", marker, self.time, self.headline, self.detail)
    }
}

/// `2024-05-01T12:34:56.789` -> `12:34:56`. Falls back to the raw text.
pub fn clock_time(timestamp: &str) -> &str {
    match timestamp.split_once('T') {
        Some((_, rest)) => rest.split('.').next().unwrap_or(rest),
        None => timestamp,
    }
}

fn text_or_blank(value: Option<&str>) -> String {
    value.unwrap_or("--").to_string()
}

fn number_or_blank(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "--".to_string())
}
