// Intent classification for free-text travel questions
// The HTTP service sits behind a trait so callers can be tested without network access

use crate::config::IntentConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const FALLBACK_ANSWER: &str = "I'm not sure how to help with that.";

// Error types for the intent service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Error fetching response from intent service: {status_code} - {body}")]
    Status { status_code: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Client error: {0}")]
    Client(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntentResult {
    Recognized { name: String, confidence: f64 },
    Unrecognized,
}

impl IntentResult {
    // Text shown to the user
    pub fn answer(&self) -> &str {
        match self {
            IntentResult::Recognized { name, .. } => name.as_str(),
            IntentResult::Unrecognized => FALLBACK_ANSWER,
        }
    }
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify_intent(&self, question: &str) -> Result<IntentResult, ServiceError>;
}

// Wire format of a successful /message response
#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    intents: Vec<MessageIntent>,
}

#[derive(Debug, Deserialize)]
struct MessageIntent {
    name: String,
    #[serde(default)]
    confidence: f64,
}

// Turn a raw status and body into a result; only the first intent is used
pub fn interpret_response(status_code: u16, body: &str) -> Result<IntentResult, ServiceError> {
    if status_code != 200 {
        return Err(ServiceError::Status {
            status_code,
            body: body.to_string(),
        });
    }

    let parsed: MessageResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    Ok(match parsed.intents.into_iter().next() {
        Some(intent) => IntentResult::Recognized {
            name: intent.name.replace('_', " "),
            confidence: intent.confidence,
        },
        None => IntentResult::Unrecognized,
    })
}

// Client for a Wit.ai compatible /message endpoint
pub struct WitClient {
    http: reqwest::Client,
    message_url: String,
    access_token: String,
    api_version: String,
}

impl WitClient {
    pub fn new(config: &IntentConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Self::with_client(config, http)
    }

    // Use a preconfigured HTTP client (proxy, TLS or timeout settings of its own)
    pub fn with_client(config: &IntentConfig, http: reqwest::Client) -> Result<Self, ServiceError> {
        let access_token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ServiceError::Client("no access token configured".to_string()))?;

        Ok(Self {
            http,
            message_url: format!("{}/message", config.base_url.trim_end_matches('/')),
            access_token,
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl IntentClassifier for WitClient {
    async fn classify_intent(&self, question: &str) -> Result<IntentResult, ServiceError> {
        debug!(url = %self.message_url, "Classifying question");

        // One attempt only; failures go straight back to the caller
        let response = self
            .http
            .get(&self.message_url)
            .bearer_auth(&self.access_token)
            .query(&[("v", self.api_version.as_str()), ("q", question)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Intent service unreachable");
                ServiceError::Network(e.to_string())
            })?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if status_code != 200 {
            warn!(status_code, "Intent service returned an error");
        }
        interpret_response(status_code, &body)
    }
}
