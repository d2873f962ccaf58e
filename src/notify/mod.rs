//! Outbound notifications
//!
//! One webhook call per notice: `POST {base}/trigger/{event}/with/key/{key}`
//! with `{"value1": "<label>"}` as the body. Only HTTP 200 counts as delivered.

pub mod webhook;

#[cfg(target_os = "espidf")]
pub use webhook::*;

use crate::system::config::NetworkConfig;
use crate::types::NOTIFY_OK_STATUS;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    value1: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub url: String,
    pub body: String,
}

impl WebhookRequest {
    pub fn new(config: &NetworkConfig, label: &str) -> Result<Self, NotifyError> {
        let url = format!(
            "{}/trigger/{}/with/key/{}",
            config.webhook_base_url.trim_end_matches('/'),
            config.webhook_event,
            config.webhook_key
        );
        let body = serde_json::to_string(&WebhookPayload { value1: label })
            .map_err(|e| NotifyError::Encode(e.to_string()))?;
        Ok(Self { url, body })
    }
}

pub fn classify_status(status: u16) -> Result<(), NotifyError> {
    if status == NOTIFY_OK_STATUS {
        Ok(())
    } else {
        Err(NotifyError::Status(status))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    Encode(String),
    Transport(String),
    Status(u16),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Encode(msg) => write!(f, "failed to encode notification: {}", msg),
            NotifyError::Transport(msg) => write!(f, "notification transport error: {}", msg),
            NotifyError::Status(code) => write!(f, "notification rejected with HTTP {}", code),
        }
    }
}

impl std::error::Error for NotifyError {}
