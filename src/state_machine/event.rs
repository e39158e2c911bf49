//! Events that can occur in a session

use crate::catalog::ElectronicComponent;
use crate::llm::GatewayErrorKind;
use serde::Serialize;

/// What an outbound AI request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiRequestKind {
    /// Ignite: one project idea for the drawn components
    Idea,
    /// Huddle: the mentor's first question on stage entry
    HuddleOpening,
    /// Huddle: reply to a student turn
    HuddleReply,
    /// Build: the final project brief
    Brief,
}

/// Identifies the session incarnation and purpose of an AI request.
///
/// Completions whose generation no longer matches the session are stale
/// and must not touch the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestTag {
    pub generation: u64,
    pub kind: AiRequestKind,
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User triggers
    DrawComponents {
        components: Vec<ElectronicComponent>,
    },
    GenerateIdea,
    SubmitTurn {
        text: String,
    },
    Proceed,
    Reset,

    // Gateway completions
    AiResponse {
        tag: RequestTag,
        text: String,
    },
    AiFailure {
        tag: RequestTag,
        kind: GatewayErrorKind,
        message: String,
    },
}

impl Event {
    /// Name of the renderer trigger that produces this event, if any
    pub fn trigger_name(&self) -> Option<&'static str> {
        match self {
            Event::DrawComponents { .. } => Some("drawComponents"),
            Event::GenerateIdea => Some("generateIdea"),
            Event::SubmitTurn { .. } => Some("submitTurn"),
            Event::Proceed => Some("proceed"),
            Event::Reset => Some("resetSession"),
            Event::AiResponse { .. } | Event::AiFailure { .. } => None,
        }
    }

    pub fn request_tag(&self) -> Option<RequestTag> {
        match self {
            Event::AiResponse { tag, .. } | Event::AiFailure { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// Gateway classification carried by a failed completion
    pub fn failure(&self) -> Option<(GatewayErrorKind, &str)> {
        match self {
            Event::AiFailure { kind, message, .. } => Some((*kind, message.as_str())),
            _ => None,
        }
    }
}
