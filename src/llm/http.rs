//! HTTP gateway client
//!
//! Talks to the mentor backend endpoint, which accepts
//! `{ systemInstruction, conversationHistory }` and answers `{ text }`.

use super::types::{primed_history, validate_request, Message};
use super::{AiGateway, GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default backend endpoint when `HCD_AI_ENDPOINT` is unset
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/gemini";

/// Configuration for the gateway client
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        std::env::var("HCD_AI_ENDPOINT")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .map_or_else(Self::default, |endpoint| Self { endpoint })
    }
}

/// Gateway implementation over a single HTTP POST
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    /// No request timeout is configured: a hung backend only keeps the
    /// calling stage busy.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn translate_request<'a>(system_instruction: &'a str, history: &[Message]) -> WireRequest<'a> {
        WireRequest {
            system_instruction,
            conversation_history: history_to_wire(system_instruction, history),
        }
    }

    fn normalize_response(body: &str) -> Result<String, GatewayError> {
        let response: WireResponse = serde_json::from_str(body).map_err(|e| {
            GatewayError::invalid_response(format!("Failed to parse response: {e} - body: {body}"))
        })?;
        Ok(response.text)
    }

    fn classify_status(status: reqwest::StatusCode, body: &str) -> GatewayError {
        match serde_json::from_str::<WireErrorBody>(body) {
            Ok(error_body) => {
                GatewayError::server_error(format!("HTTP {status}: {}", error_body.error))
            }
            Err(_) => GatewayError::server_error(format!("HTTP {status} error: {body}")),
        }
    }
}

fn history_to_wire(system_instruction: &str, history: &[Message]) -> Vec<WireMessage> {
    primed_history(system_instruction, history)
        .into_iter()
        .map(|msg| WireMessage {
            role: msg.role().as_str(),
            parts: vec![WirePart {
                text: msg.text().to_string(),
            }],
        })
        .collect()
}

#[async_trait]
impl AiGateway for HttpGateway {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Message],
    ) -> Result<String, GatewayError> {
        validate_request(system_instruction, history)?;
        let request = Self::translate_request(system_instruction, history);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::network(format!("Connection failed: {e}"))
                } else {
                    GatewayError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        Self::normalize_response(&body)
    }

    fn backend_name(&self) -> &str {
        &self.endpoint
    }
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    system_instruction: &'a str,
    conversation_history: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    #[serde(alias = "message")]
    error: String,
}
