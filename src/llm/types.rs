//! Conversation types shared with the AI backend

use super::GatewayError;
use serde::{Deserialize, Serialize};

/// Model turn that acknowledges the injected persona instruction.
pub const PRIMING_ACK: &str = "Understood. I will follow these instructions.";

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Model,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// One conversation turn. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: MessageRole,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            text: text.into(),
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Check the gateway input preconditions before anything goes on the wire.
pub fn validate_request(
    system_instruction: &str,
    history: &[Message],
) -> Result<(), GatewayError> {
    if system_instruction.trim().is_empty() {
        return Err(GatewayError::validation("System instruction must not be empty"));
    }
    if history.is_empty() {
        return Err(GatewayError::validation(
            "History must contain at least one turn",
        ));
    }
    Ok(())
}

/// Build the outbound history: priming pair first, then the caller's turns
/// in their original order.
pub fn primed_history(system_instruction: &str, history: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::user(system_instruction));
    messages.push(Message::model(PRIMING_ACK));
    messages.extend(history.iter().cloned());
    messages
}
