/// A telemetry record that cannot be interpreted. Callers drop these silently.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("unknown domain tag: {0}")]
    UnknownDomain(String),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Outbound control request failures.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected request with status {status}")]
    Rejected { status: u16 },
}

/// Voice narration failures. Logged and skipped, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to launch speech command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("speech command exited with code {code:?}")]
    Exit { code: Option<i32> },
}
