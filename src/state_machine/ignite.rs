//! Ignite stage: draw three components, ask for an idea, proceed

use super::transition::{TransitionError, TransitionResult};
use super::{
    AiRequestKind, Effect, Event, HuddleStage, IgniteStage, SessionContext, SessionState, Stage,
};
use crate::catalog::{is_valid_selection, DRAW_SIZE};
use crate::persona::{self, MENTOR_UNAVAILABLE};

pub(super) fn transition(
    state: &SessionState,
    stage: &IgniteStage,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::DrawComponents { .. } | Event::GenerateIdea | Event::Proceed
            if stage.generating =>
        {
            Err(TransitionError::Busy)
        }

        Event::DrawComponents { components } => {
            if !is_valid_selection(&components) {
                return Err(TransitionError::validation(format!(
                    "A draw must contain {DRAW_SIZE} distinct catalog components"
                )));
            }
            // A new draw invalidates any idea generated for the old one.
            let next = SessionState {
                stage: Stage::Ignite(IgniteStage::default()),
                project_idea: String::new(),
                selected_components: components,
                huddle_transcript: Vec::new(),
            };
            Ok(TransitionResult::new(next).with_effect(Effect::NotifySnapshot))
        }

        Event::GenerateIdea => {
            if state.selected_components.is_empty() {
                return Err(TransitionError::validation(
                    "Draw components before generating an idea",
                ));
            }
            let request = Effect::request_ai(
                context,
                AiRequestKind::Idea,
                persona::ignite_instruction(),
                vec![persona::ignite_prompt(&state.selected_components)],
            );
            let next = SessionState {
                stage: Stage::Ignite(IgniteStage {
                    generating: true,
                    last_error: None,
                }),
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(request)
                .with_effect(Effect::NotifySnapshot))
        }

        Event::AiResponse { tag, text } if tag.kind == AiRequestKind::Idea && stage.generating => {
            let next = SessionState {
                stage: Stage::Ignite(IgniteStage::default()),
                project_idea: text,
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_effect(Effect::NotifySnapshot))
        }

        Event::AiFailure { tag, .. } if tag.kind == AiRequestKind::Idea && stage.generating => {
            let next = SessionState {
                stage: Stage::Ignite(IgniteStage {
                    generating: false,
                    last_error: Some(MENTOR_UNAVAILABLE.to_string()),
                }),
                project_idea: String::new(),
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_effect(Effect::NotifySnapshot))
        }

        Event::Proceed => {
            if !state.can_proceed() {
                return Err(TransitionError::validation(format!(
                    "An idea and {DRAW_SIZE} components are needed before the Huddle"
                )));
            }
            enter_huddle(state, context)
        }

        Event::SubmitTurn { .. } => Err(TransitionError::invalid(
            "the Ignite stage has no conversation",
        )),

        Event::Reset => Err(TransitionError::invalid(
            "reset is handled before stage dispatch",
        )),

        Event::AiResponse { tag, .. } | Event::AiFailure { tag, .. } => {
            Err(TransitionError::invalid(format!(
                "unexpected {:?} completion in Ignite",
                tag.kind
            )))
        }
    }
}

/// Carry the idea and components into the Huddle and ask for its opening question.
fn enter_huddle(
    state: &SessionState,
    context: &SessionContext,
) -> Result<TransitionResult, TransitionError> {
    let request = Effect::request_ai(
        context,
        AiRequestKind::HuddleOpening,
        persona::huddle_instruction(&state.project_idea),
        vec![persona::huddle_opening(&state.project_idea)],
    );
    let next = SessionState {
        stage: Stage::Huddle(HuddleStage {
            awaiting_reply: true,
        }),
        project_idea: state.project_idea.clone(),
        selected_components: state.selected_components.clone(),
        huddle_transcript: Vec::new(),
    };
    Ok(TransitionResult::new(next)
        .with_effect(request)
        .with_effect(Effect::NotifySnapshot))
}
