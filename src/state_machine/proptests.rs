//! Property-based tests for the stage controller
//!
//! These tests verify key invariants hold across arbitrary trigger and
//! completion sequences.

use super::event::RequestTag;
use super::state::StageKind;
use super::*;
use crate::catalog::{is_valid_selection, ElectronicComponent, CATALOG};
use crate::llm::GatewayErrorKind;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Marker generations resolved against the live context when applied
const CURRENT: u64 = 0;
const STALE: u64 = 1;

/// Point a generated completion at the live generation or a stale one.
fn materialize(event: Event, context: &SessionContext) -> Event {
    let resolve = |tag: RequestTag| RequestTag {
        generation: if tag.generation == CURRENT {
            context.generation
        } else {
            context.generation + 1
        },
        kind: tag.kind,
    };
    match event {
        Event::AiResponse { tag, text } => Event::AiResponse {
            tag: resolve(tag),
            text,
        },
        Event::AiFailure { tag, kind, message } => Event::AiFailure {
            tag: resolve(tag),
            kind,
            message,
        },
        other => other,
    }
}

/// Execute the runtime-owned effects that the pure model needs.
fn apply_effects(effects: &[Effect], context: &mut SessionContext) {
    for effect in effects {
        if *effect == Effect::BeginSession {
            context.generation += 1;
        }
    }
}

fn request_count(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| e.is_request()).count()
}

fn is_valid_state(state: &SessionState) -> bool {
    let selection_ok =
        state.selected_components.is_empty() || is_valid_selection(&state.selected_components);
    let stage_ok = match &state.stage {
        Stage::Ignite(_) => state.huddle_transcript.is_empty(),
        Stage::Huddle(_) => {
            !state.project_idea.is_empty() && is_valid_selection(&state.selected_components)
        }
        Stage::Build(_) => {
            !state.project_idea.is_empty()
                && is_valid_selection(&state.selected_components)
                && state.huddle_transcript.len() >= 2
        }
    };
    selection_ok && stage_ok
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_valid_selection() -> impl Strategy<Value = Vec<ElectronicComponent>> {
    proptest::sample::subsequence(CATALOG.to_vec(), 3).prop_shuffle()
}

fn arb_selection() -> impl Strategy<Value = Vec<ElectronicComponent>> {
    prop_oneof![
        8 => arb_valid_selection(),
        1 => proptest::sample::subsequence(CATALOG.to_vec(), 0..=4),
        1 => proptest::sample::select(CATALOG.to_vec()).prop_map(|c| vec![c, c, c]),
    ]
}

fn arb_request_kind() -> impl Strategy<Value = AiRequestKind> {
    prop_oneof![
        Just(AiRequestKind::Idea),
        Just(AiRequestKind::HuddleOpening),
        Just(AiRequestKind::HuddleReply),
        Just(AiRequestKind::Brief),
    ]
}

fn arb_tag() -> impl Strategy<Value = RequestTag> {
    (arb_request_kind(), prop_oneof![9 => Just(CURRENT), 1 => Just(STALE)])
        .prop_map(|(kind, generation)| RequestTag { generation, kind })
}

fn arb_gateway_error_kind() -> impl Strategy<Value = GatewayErrorKind> {
    prop_oneof![
        Just(GatewayErrorKind::Network),
        Just(GatewayErrorKind::ServerError),
        Just(GatewayErrorKind::InvalidResponse),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        2 => arb_selection().prop_map(|components| Event::DrawComponents { components }),
        2 => Just(Event::GenerateIdea),
        3 => "[a-zA-Z ]{0,20}".prop_map(|text| Event::SubmitTurn { text }),
        3 => Just(Event::Proceed),
        1 => Just(Event::Reset),
        5 => (arb_tag(), "[a-zA-Z' ,]{0,30}")
            .prop_map(|(tag, text)| Event::AiResponse { tag, text }),
        2 => (arb_tag(), arb_gateway_error_kind(), "[a-z ]{1,20}")
            .prop_map(|(tag, kind, message)| Event::AiFailure { tag, kind, message }),
    ]
}

/// A state reached by replaying arbitrary events from the initial state
fn arb_reachable_state() -> impl Strategy<Value = (SessionState, SessionContext)> {
    proptest::collection::vec(arb_event(), 0..40).prop_map(|events| {
        let mut state = SessionState::default();
        let mut context = SessionContext::default();
        for event in events {
            if let Ok(result) = transition(&state, &context, materialize(event, &context)) {
                apply_effects(&result.effects, &mut context);
                state = result.new_state;
            }
        }
        (state, context)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Every accepted transition lands in a structurally valid state
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::default();
        let mut context = SessionContext::default();

        for event in events {
            if let Ok(result) = transition(&state, &context, materialize(event, &context)) {
                apply_effects(&result.effects, &mut context);
                state = result.new_state;
                prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
            }
        }
    }

    // Busy is set only from idle, and a busy stage only ever becomes idle
    #[test]
    fn prop_at_most_one_call_in_flight(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::default();
        let mut context = SessionContext::default();

        for event in events {
            if let Ok(result) = transition(&state, &context, materialize(event, &context)) {
                let requests = request_count(&result.effects);
                prop_assert!(requests <= 1);
                if requests == 1 {
                    prop_assert!(!state.is_busy(), "request issued while busy: {:?}", state);
                    prop_assert!(result.new_state.is_busy());
                }
                if state.is_busy() {
                    prop_assert!(!result.new_state.is_busy(), "busy set twice: {:?}", state);
                }
                if result.new_state.is_busy() {
                    prop_assert_eq!(requests, 1);
                }
                apply_effects(&result.effects, &mut context);
                state = result.new_state;
            }
        }
    }

    // The transcript grows by two per answered turn and only shrinks on reset
    #[test]
    fn prop_transcript_append_only(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut state = SessionState::default();
        let mut context = SessionContext::default();
        let mut len_before_turn: Option<usize> = None;

        for event in events {
            let is_reset = matches!(event, Event::Reset);
            let is_turn = matches!(event, Event::SubmitTurn { .. });
            let Ok(result) = transition(&state, &context, materialize(event, &context)) else {
                continue;
            };
            let old_len = state.huddle_transcript.len();
            let new_len = result.new_state.huddle_transcript.len();

            if is_reset {
                prop_assert_eq!(new_len, 0);
                len_before_turn = None;
            } else {
                prop_assert!(new_len >= old_len);
                prop_assert!(new_len - old_len <= 1);
                prop_assert_eq!(
                    &result.new_state.huddle_transcript[..old_len],
                    state.huddle_transcript.as_slice()
                );
            }

            if is_turn {
                len_before_turn = Some(old_len);
            } else if let (Some(before), Stage::Huddle(h)) =
                (len_before_turn, &result.new_state.stage)
            {
                if !h.awaiting_reply {
                    prop_assert_eq!(new_len, before + 2);
                    len_before_turn = None;
                }
            }

            apply_effects(&result.effects, &mut context);
            state = result.new_state;
        }
    }

    // Ignite -> Huddle needs an idea and three components
    #[test]
    fn prop_huddle_gate((state, context) in arb_reachable_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, &context, materialize(event, &context)) {
            if state.stage.kind() == StageKind::Ignite
                && result.new_state.stage.kind() == StageKind::Huddle
            {
                prop_assert!(!state.project_idea.is_empty());
                prop_assert_eq!(state.selected_components.len(), 3);
                prop_assert!(!state.is_busy());
            }
        }
    }

    // Huddle -> Build needs two messages and no reply in flight
    #[test]
    fn prop_build_gate((state, context) in arb_reachable_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, &context, materialize(event, &context)) {
            if state.stage.kind() == StageKind::Huddle
                && result.new_state.stage.kind() == StageKind::Build
            {
                prop_assert!(state.huddle_transcript.len() >= 2);
                prop_assert!(!state.is_busy());
            }
        }
    }

    // Reset from anywhere yields the initial state and a new session
    #[test]
    fn prop_reset_restores_initial_state((state, context) in arb_reachable_state()) {
        let result = transition(&state, &context, Event::Reset).unwrap();
        prop_assert_eq!(&result.new_state, &SessionState::default());
        prop_assert!(result.effects.contains(&Effect::BeginSession));

        // Idempotent: resetting the fresh state changes nothing
        let again = transition(&result.new_state, &context, Event::Reset).unwrap();
        prop_assert_eq!(again.new_state, result.new_state);
    }

    // Completions from another generation are always discarded
    #[test]
    fn prop_stale_completions_rejected(
        (state, context) in arb_reachable_state(),
        kind in arb_request_kind(),
        text in "[a-z ]{0,20}",
    ) {
        let stale = RequestTag { generation: context.generation + 1, kind };
        let result = transition(&state, &context, Event::AiResponse { tag: stale, text });
        let is_stale = matches!(result, Err(TransitionError::StaleResponse { .. }));
        prop_assert!(is_stale);
    }

    // Triggers reported enabled are exactly the ones the transition accepts
    #[test]
    fn prop_snapshot_triggers_match_transitions(
        (state, context) in arb_reachable_state(),
        components in arb_valid_selection(),
    ) {
        let triggers = SessionSnapshot::capture(&state, &context).triggers;

        let draw = transition(&state, &context, Event::DrawComponents { components });
        prop_assert_eq!(triggers.draw_components, draw.is_ok());
        let generate = transition(&state, &context, Event::GenerateIdea);
        prop_assert_eq!(triggers.generate_idea, generate.is_ok());
        let turn = transition(&state, &context, Event::SubmitTurn { text: "hello".to_string() });
        prop_assert_eq!(triggers.submit_turn, turn.is_ok());
        let proceed = transition(&state, &context, Event::Proceed);
        prop_assert_eq!(triggers.proceed, proceed.is_ok());
    }
}
