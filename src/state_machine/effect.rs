//! Effects produced by state transitions

use super::event::{AiRequestKind, RequestTag};
use super::state::SessionContext;
use crate::llm::Message;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one gateway call; its completion comes back as an event
    /// carrying `tag`
    RequestAi {
        tag: RequestTag,
        system_instruction: String,
        history: Vec<Message>,
    },

    /// Start a new session incarnation (bump the generation)
    BeginSession,

    /// Push the new snapshot to subscribers
    NotifySnapshot,
}

impl Effect {
    pub fn request_ai(
        context: &SessionContext,
        kind: AiRequestKind,
        system_instruction: impl Into<String>,
        history: Vec<Message>,
    ) -> Self {
        Effect::RequestAi {
            tag: RequestTag {
                generation: context.generation,
                kind,
            },
            system_instruction: system_instruction.into(),
            history,
        }
    }

    #[cfg(test)]
    pub fn is_request(&self) -> bool {
        matches!(self, Effect::RequestAi { .. })
    }
}
