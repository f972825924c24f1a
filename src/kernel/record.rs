use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::RecordError;

/// The dashboard's three surveillance domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Domain {
    Finance,
    Healthcare,
    Devops,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Finance, Domain::Healthcare, Domain::Devops];

    /// Accepts both backend tags and UI tags. The backend labels devops
    /// records `developer`, the UI calls the same domain `dev`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "finance" => Some(Domain::Finance),
            "healthcare" | "health" => Some(Domain::Healthcare),
            "devops" | "dev" | "developer" => Some(Domain::Devops),
            _ => None,
        }
    }

    /// Tag the backend's control endpoints expect.
    pub fn ui_tag(self) -> &'static str {
        match self {
            Domain::Finance => "finance",
            Domain::Healthcare => "health",
            Domain::Devops => "dev",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Finance => "finance",
            Domain::Healthcare => "healthcare",
            Domain::Devops => "devops",
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for Domain {
    type Error = RecordError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Domain::parse(&tag).ok_or(RecordError::UnknownDomain(tag))
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Normal,
    Critical,
    Other(String),
}

impl Status {
    fn from_tag(tag: String) -> Self {
        match tag.as_str() {
            "NORMAL" => Status::Normal,
            "CRITICAL" => Status::Critical,
            _ => Status::Other(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Other(String),
}

impl Level {
    fn from_tag(tag: String) -> Self {
        match tag.as_str() {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARN" | "WARNING" => Level::Warn,
            "ERROR" => Level::Error,
            "FATAL" => Level::Fatal,
            _ => Level::Other(tag),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketTick {
    pub symbol: Option<String>,
    pub price: Option<f64>,
    /// Percent change.
    pub delta: Option<f64>,
    pub news: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vitals {
    pub patient_id: Option<String>,
    pub bpm: Option<f64>,
    pub spo2: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogLine {
    pub service: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Finance(MarketTick),
    Healthcare(Vitals),
    Devops(LogLine),
}

/// One telemetry record pushed by the backend.
///
/// Only the payload matching the `domain` tag is kept, so a record can never
/// carry two domains' fields at once.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct TelemetryRecord {
    pub timestamp: String,
    pub status: Option<Status>,
    pub level: Option<Level>,
    pub is_manual: bool,
    pub payload: Payload,
}

impl TelemetryRecord {
    pub fn new(timestamp: impl Into<String>, payload: Payload) -> Self {
        Self {
            timestamp: timestamp.into(),
            status: None,
            level: None,
            is_manual: false,
            payload,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn manual(mut self) -> Self {
        self.is_manual = true;
        self
    }

    pub fn domain(&self) -> Domain {
        match self.payload {
            Payload::Finance(_) => Domain::Finance,
            Payload::Healthcare(_) => Domain::Healthcare,
            Payload::Devops(_) => Domain::Devops,
        }
    }
}

// Wire shape as the producer emits it. Everything past the identity fields
// stays untyped: numeric strings parse, scalars coerce to text, and garbage
// degrades to "absent" instead of rejecting the whole record.
#[derive(Debug, Deserialize)]
struct RawRecord {
    domain: String,
    timestamp: String,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    level: Option<Value>,
    #[serde(default)]
    is_manual: Option<Value>,

    #[serde(default)]
    symbol: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    delta: Option<Value>,
    #[serde(default)]
    news: Option<Value>,

    #[serde(default)]
    patient_id: Option<Value>,
    #[serde(default)]
    bpm: Option<Value>,
    #[serde(default)]
    spo2: Option<Value>,
    #[serde(default)]
    notes: Option<Value>,

    #[serde(default)]
    service: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl TryFrom<RawRecord> for TelemetryRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let domain = Domain::parse(&raw.domain).ok_or(RecordError::UnknownDomain(raw.domain))?;

        let payload = match domain {
            Domain::Finance => Payload::Finance(MarketTick {
                symbol: lenient_text(raw.symbol),
                price: lenient_number(raw.price.as_ref()),
                delta: lenient_number(raw.delta.as_ref()),
                news: lenient_text(raw.news),
            }),
            Domain::Healthcare => Payload::Healthcare(Vitals {
                patient_id: lenient_text(raw.patient_id),
                bpm: lenient_number(raw.bpm.as_ref()),
                spo2: lenient_number(raw.spo2.as_ref()),
                notes: lenient_text(raw.notes),
            }),
            Domain::Devops => Payload::Devops(LogLine {
                service: lenient_text(raw.service),
                message: lenient_text(raw.message),
            }),
        };

        Ok(Self {
            timestamp: raw.timestamp,
            status: lenient_text(raw.status).map(Status::from_tag),
            level: lenient_text(raw.level).map(Level::from_tag),
            is_manual: truthy(raw.is_manual.as_ref()),
            payload,
        })
    }
}

/// Numbers and numeric strings parse; everything else is absent.
pub fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Strings pass through, numbers and booleans are rendered as text.
pub fn lenient_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flag semantics the producer relies on: `1`, `"yes"` and `true` all set it;
/// `0`, `""`, `false` and `null` do not.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
