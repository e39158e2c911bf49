//! AI gateway abstraction
//!
//! Every call is a stateless replay: the persona instruction and the full
//! history travel with each request, so no conversation state lives here.

mod error;
mod http;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{GatewayError, GatewayErrorKind};
pub use http::{GatewayConfig, HttpGateway};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for AI backends
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Generate the next model turn for `history` under `system_instruction`
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Message],
    ) -> Result<String, GatewayError>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &str;
}

#[async_trait]
impl<T: AiGateway + ?Sized> AiGateway for Arc<T> {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Message],
    ) -> Result<String, GatewayError> {
        (**self).generate(system_instruction, history).await
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }
}

/// Logging wrapper for AI gateways
pub struct LoggingGateway<G> {
    inner: G,
    backend_name: String,
}

impl<G: AiGateway> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        let backend_name = inner.backend_name().to_string();
        Self {
            inner,
            backend_name,
        }
    }
}

#[async_trait]
impl<G: AiGateway> AiGateway for LoggingGateway<G> {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Message],
    ) -> Result<String, GatewayError> {
        let request_id = uuid::Uuid::new_v4();
        let start = std::time::Instant::now();
        let result = self.inner.generate(system_instruction, history).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    %request_id,
                    backend = %self.backend_name,
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    response_chars = text.chars().count(),
                    "AI request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    %request_id,
                    backend = %self.backend_name,
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "AI request failed"
                );
            }
        }

        result
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
