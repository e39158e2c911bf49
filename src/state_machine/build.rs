//! Build stage: a single brief generation, then read-only

use super::transition::{TransitionError, TransitionResult};
use super::{AiRequestKind, Brief, BuildStage, Effect, Event, SessionState, Stage};
use crate::persona::MENTOR_UNAVAILABLE;

pub(super) fn transition(
    state: &SessionState,
    stage: &BuildStage,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let generating = stage.brief == Brief::Generating;

    match event {
        Event::AiResponse { tag, text } if tag.kind == AiRequestKind::Brief && generating => {
            Ok(finish(state, Brief::Ready(text)))
        }

        Event::AiFailure { tag, .. } if tag.kind == AiRequestKind::Brief && generating => {
            Ok(finish(state, Brief::Failed(MENTOR_UNAVAILABLE.to_string())))
        }

        Event::DrawComponents { .. }
        | Event::GenerateIdea
        | Event::SubmitTurn { .. }
        | Event::Proceed
            if generating =>
        {
            Err(TransitionError::Busy)
        }

        Event::DrawComponents { .. }
        | Event::GenerateIdea
        | Event::SubmitTurn { .. }
        | Event::Proceed => Err(TransitionError::invalid(
            "the Build stage takes no further input, reset to start over",
        )),

        Event::AiResponse { tag, .. } | Event::AiFailure { tag, .. } => {
            Err(TransitionError::invalid(format!(
                "unexpected {:?} completion in Build",
                tag.kind
            )))
        }

        Event::Reset => Err(TransitionError::invalid(
            "reset is handled before stage dispatch",
        )),
    }
}

fn finish(state: &SessionState, brief: Brief) -> TransitionResult {
    let next = SessionState {
        stage: Stage::Build(BuildStage { brief }),
        ..state.clone()
    };
    TransitionResult::new(next).with_effect(Effect::NotifySnapshot)
}
