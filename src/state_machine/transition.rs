//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. Network calls and notifications are returned as effects.

use super::{build, huddle, ignite};
use super::{Effect, Event, SessionContext, SessionState, Stage};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("The mentor is still responding, wait for the current request to finish")]
    Busy,
    #[error("{0}")]
    Validation(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Discarding response for generation {tagged}, session is at generation {current}")]
    StaleResponse { tagged: u64, current: u64 },
}

impl TransitionError {
    pub(super) fn validation(message: impl Into<String>) -> Self {
        TransitionError::Validation(message.into())
    }

    pub(super) fn invalid(message: impl Into<String>) -> Self {
        TransitionError::InvalidTransition(message.into())
    }
}

/// Pure transition function
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    if let Some(tag) = event.request_tag() {
        if tag.generation != context.generation {
            return Err(TransitionError::StaleResponse {
                tagged: tag.generation,
                current: context.generation,
            });
        }
    }

    match (&state.stage, event) {
        // Reset is accepted from anywhere, even with a call in flight: the
        // generation bump makes that call's completion stale.
        (_, Event::Reset) => Ok(TransitionResult::new(SessionState::default())
            .with_effect(Effect::BeginSession)
            .with_effect(Effect::NotifySnapshot)),

        (Stage::Ignite(stage), event) => ignite::transition(state, stage, context, event),
        (Stage::Huddle(stage), event) => huddle::transition(state, stage, context, event),
        (Stage::Build(stage), event) => build::transition(state, stage, event),
    }
}
