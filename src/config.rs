//! Dashboard configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via `apply_cli_overrides`)
//! 2. Environment variables (`SYNAPTIX_*`)
//! 3. Config file (`--config`, or `synaptix.toml` in the working directory)
//! 4. Compiled defaults

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::kernel::reactor::ReactorConfig;
use crate::kernel::record::Domain;
use crate::kernel::scheduler::NARRATIVE_INTERVAL;
use crate::kernel::state::DEFAULT_FEED_CAPACITY;

pub const DEFAULT_CONFIG_FILE: &str = "synaptix.toml";
/// Longest accepted gap between narrative lines.
pub const MAX_NARRATIVE_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub initial_domain: Domain,
    pub backend: BackendConfig,
    pub narrative: NarrativeConfig,
    pub feed: FeedConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub interval_ms: u64,
    pub cancel_on_domain_switch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_domain: Domain::Finance,
            backend: BackendConfig::default(),
            narrative: NarrativeConfig::default(),
            feed: FeedConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            interval_ms: NARRATIVE_INTERVAL.as_millis() as u64,
            cancel_on_domain_switch: true,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: "say".to_string(),
            args: Vec::new(),
        }
    }
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub domain: Option<Domain>,
    pub backend_url: Option<String>,
    pub voice: Option<bool>,
}

impl Config {
    /// `path` is an explicit `--config`; a missing explicit file is an error,
    /// a missing default file is not.
    pub fn load(path: Option<&Path>, cli: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        if let Some(cli) = cli {
            config.apply_cli_overrides(cli);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// `lookup` abstracts the environment so tests don't mutate process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tag) = lookup("SYNAPTIX_DOMAIN") {
            self.initial_domain = Domain::parse(&tag).ok_or_else(|| ConfigError::Invalid {
                field: "SYNAPTIX_DOMAIN".to_string(),
                message: format!("unknown domain '{}'", tag),
            })?;
        }
        if let Some(url) = lookup("SYNAPTIX_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(flag) = lookup("SYNAPTIX_VOICE") {
            self.voice.enabled = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(domain) = cli.domain {
            self.initial_domain = domain;
        }
        if let Some(url) = &cli.backend_url {
            self.backend.url = url.clone();
        }
        if let Some(voice) = cli.voice {
            self.voice.enabled = voice;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.narrative.interval_ms == 0 || self.narrative.interval_ms > MAX_NARRATIVE_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                field: "narrative.interval_ms".to_string(),
                message: format!("must be between 1 and {}", MAX_NARRATIVE_INTERVAL_MS),
            });
        }
        if self.feed.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "feed.capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "backend.url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.voice.enabled && self.voice.program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "voice.program".to_string(),
                message: "required when voice is enabled".to_string(),
            });
        }
        Ok(())
    }

    pub fn reactor(&self) -> ReactorConfig {
        ReactorConfig {
            initial_domain: self.initial_domain,
            feed_capacity: self.feed.capacity,
            cancel_on_domain_switch: self.narrative.cancel_on_domain_switch,
        }
    }

    pub fn narrative_interval(&self) -> Duration {
        Duration::from_millis(self.narrative.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.timeout_ms)
    }
}
