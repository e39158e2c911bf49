//! Huddle stage: coaching conversation about the user of the idea

use super::transition::{TransitionError, TransitionResult};
use super::{
    AiRequestKind, Brief, BuildStage, Effect, Event, HuddleStage, SessionContext, SessionState,
    Stage,
};
use crate::llm::Message;
use crate::persona::{self, MENTOR_UNAVAILABLE};

pub(super) fn transition(
    state: &SessionState,
    stage: &HuddleStage,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    // The opening question is the only request made with an empty transcript.
    let expected_kind = if state.huddle_transcript.is_empty() {
        AiRequestKind::HuddleOpening
    } else {
        AiRequestKind::HuddleReply
    };

    match event {
        Event::SubmitTurn { .. } | Event::Proceed if stage.awaiting_reply => {
            Err(TransitionError::Busy)
        }

        Event::SubmitTurn { text } => {
            if text.trim().is_empty() {
                return Err(TransitionError::validation("Message must not be empty"));
            }
            let mut transcript = state.huddle_transcript.clone();
            transcript.push(Message::user(text));

            let request = Effect::request_ai(
                context,
                AiRequestKind::HuddleReply,
                persona::huddle_instruction(&state.project_idea),
                transcript.clone(),
            );
            let next = SessionState {
                stage: Stage::Huddle(HuddleStage {
                    awaiting_reply: true,
                }),
                huddle_transcript: transcript,
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(request)
                .with_effect(Effect::NotifySnapshot))
        }

        Event::AiResponse { tag, text } if tag.kind == expected_kind && stage.awaiting_reply => {
            Ok(append_model_turn(state, Message::model(text)))
        }

        Event::AiFailure { tag, .. } if tag.kind == expected_kind && stage.awaiting_reply => {
            Ok(append_model_turn(state, Message::model(MENTOR_UNAVAILABLE)))
        }

        Event::Proceed => {
            if !state.can_proceed() {
                return Err(TransitionError::validation(
                    "Exchange at least one turn with the mentor before building",
                ));
            }
            Ok(enter_build(state, context))
        }

        Event::DrawComponents { .. } | Event::GenerateIdea => Err(TransitionError::invalid(
            "components and idea are fixed once the Huddle starts",
        )),

        Event::AiResponse { tag, .. } | Event::AiFailure { tag, .. } => {
            Err(TransitionError::invalid(format!(
                "unexpected {:?} completion in Huddle",
                tag.kind
            )))
        }

        Event::Reset => Err(TransitionError::invalid(
            "reset is handled before stage dispatch",
        )),
    }
}

fn append_model_turn(state: &SessionState, message: Message) -> TransitionResult {
    let mut transcript = state.huddle_transcript.clone();
    transcript.push(message);
    let next = SessionState {
        stage: Stage::Huddle(HuddleStage::default()),
        huddle_transcript: transcript,
        ..state.clone()
    };
    TransitionResult::new(next).with_effect(Effect::NotifySnapshot)
}

/// Freeze the transcript and ask for the brief in one go.
fn enter_build(state: &SessionState, context: &SessionContext) -> TransitionResult {
    let mut history = state.huddle_transcript.clone();
    history.push(persona::build_closing(&state.project_idea));

    let request = Effect::request_ai(
        context,
        AiRequestKind::Brief,
        persona::build_instruction(),
        history,
    );
    let next = SessionState {
        stage: Stage::Build(BuildStage {
            brief: Brief::Generating,
        }),
        ..state.clone()
    };
    TransitionResult::new(next)
        .with_effect(request)
        .with_effect(Effect::NotifySnapshot)
}
