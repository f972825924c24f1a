use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ControlError;
use crate::kernel::profile::profile;
use crate::kernel::record::Domain;

/// Fire-and-forget requests to the simulation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Ask the backend to inject one crisis event for a domain.
    TriggerEvent { domain: Domain },
    /// Push a new threshold for the domain's rule knob.
    UpdateRules { domain: Domain, value: i64 },
    Stabilize,
}

impl ControlRequest {
    pub fn path(&self) -> &'static str {
        match self {
            ControlRequest::TriggerEvent { .. } => "/trigger-event",
            ControlRequest::UpdateRules { .. } => "/update-rules",
            ControlRequest::Stabilize => "/stabilize",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            ControlRequest::TriggerEvent { domain } => json!({ "domain": domain.ui_tag() }),
            ControlRequest::UpdateRules { domain, value } => {
                let mut body = Map::new();
                body.insert("type".to_string(), Value::from(domain.ui_tag()));
                body.insert(profile(*domain).rule.field.to_string(), Value::from(*value));
                Value::Object(body)
            }
            ControlRequest::Stabilize => json!({}),
        }
    }
}

/// What came back from a control request. Only success or a failure reason
/// matters; response bodies are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOutcome {
    pub request: ControlRequest,
    pub error: Option<String>,
}

impl ControlOutcome {
    pub fn succeeded(request: ControlRequest) -> Self {
        Self { request, error: None }
    }

    pub fn failed(request: ControlRequest, reason: impl Into<String>) -> Self {
        Self {
            request,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone)]
pub struct ControlClient {
    client: Client,
    base_url: String,
}

impl ControlClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, request: &ControlRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }

    /// One attempt, no retry.
    pub async fn send(&self, request: &ControlRequest) -> Result<(), ControlError> {
        let response = self
            .client
            .post(self.url_for(request))
            .json(&request.body())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ControlError::Rejected {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Sends the request and folds the result into an outcome for the reactor.
    pub async fn dispatch(&self, request: ControlRequest) -> ControlOutcome {
        match self.send(&request).await {
            Ok(()) => {
                info!("Control request {} accepted", request.path());
                ControlOutcome::succeeded(request)
            }
            Err(e) => {
                warn!("Control request {} failed: {}", request.path(), e);
                ControlOutcome::failed(request, e.to_string())
            }
        }
    }
}
