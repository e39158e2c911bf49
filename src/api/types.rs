//! API request and response types

use crate::state_machine::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Request to submit a Huddle turn
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub text: String,
}

/// Response for an accepted trigger
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
    pub snapshot: SessionSnapshot,
}

impl AcceptedResponse {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self {
            accepted: true,
            snapshot,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
