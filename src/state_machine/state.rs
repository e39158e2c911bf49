//! Session state types

use crate::catalog::{is_valid_selection, ElectronicComponent};
use crate::llm::Message;
use serde::Serialize;

// ============================================================================
// Stage-local state
// ============================================================================

/// Ignite: drawing components and asking for an idea
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IgniteStage {
    /// Idea request in flight
    pub generating: bool,
    /// Apology shown after the last failed idea request
    pub last_error: Option<String>,
}

/// Huddle: free-form coaching conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HuddleStage {
    /// Mentor reply in flight
    pub awaiting_reply: bool,
}

/// Outcome slot for the Build stage's single generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Brief {
    Generating,
    Ready(String),
    /// Gateway failed; holds the apology shown instead of a brief
    Failed(String),
}

/// Build: one irreversible brief generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStage {
    pub brief: Brief,
}

/// Current stage with its local data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    Ignite(IgniteStage),
    Huddle(HuddleStage),
    Build(BuildStage),
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Ignite(IgniteStage::default())
    }
}

/// Stage names without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Ignite,
    Huddle,
    Build,
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Ignite(_) => StageKind::Ignite,
            Stage::Huddle(_) => StageKind::Huddle,
            Stage::Build(_) => StageKind::Build,
        }
    }

    /// Whether this stage has an AI call in flight
    pub fn is_busy(&self) -> bool {
        match self {
            Stage::Ignite(s) => s.generating,
            Stage::Huddle(s) => s.awaiting_reply,
            Stage::Build(s) => s.brief == Brief::Generating,
        }
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Everything one mentoring session has accumulated.
///
/// Only the pure transition function produces new values of this type;
/// the runtime swaps them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub stage: Stage,
    /// Empty until Ignite produces an idea
    pub project_idea: String,
    /// Exactly three once drawn
    pub selected_components: Vec<ElectronicComponent>,
    /// Append-only during Huddle, frozen afterwards
    pub huddle_transcript: Vec<Message>,
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        self.stage.is_busy()
    }

    pub fn can_draw_components(&self) -> bool {
        matches!(&self.stage, Stage::Ignite(s) if !s.generating)
    }

    pub fn can_generate_idea(&self) -> bool {
        self.can_draw_components() && !self.selected_components.is_empty()
    }

    pub fn can_submit_turn(&self) -> bool {
        matches!(&self.stage, Stage::Huddle(s) if !s.awaiting_reply)
    }

    pub fn can_proceed(&self) -> bool {
        match &self.stage {
            Stage::Ignite(s) => {
                !s.generating
                    && !self.project_idea.is_empty()
                    && is_valid_selection(&self.selected_components)
            }
            Stage::Huddle(s) => !s.awaiting_reply && self.huddle_transcript.len() >= 2,
            Stage::Build(_) => false,
        }
    }
}

/// Per-session configuration that is not part of the resettable state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Bumped on every reset; outbound requests carry it as their tag
    pub generation: u64,
}

// ============================================================================
// Snapshot for renderers
// ============================================================================

/// Which triggers a renderer may fire right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triggers {
    pub draw_components: bool,
    pub generate_idea: bool,
    pub submit_turn: bool,
    pub proceed: bool,
    pub reset_session: bool,
}

/// Read-only view of the session handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub stage: StageKind,
    pub busy: bool,
    pub project_idea: String,
    pub selected_components: Vec<ElectronicComponent>,
    pub transcript: Vec<Message>,
    pub brief: Option<Brief>,
    pub last_error: Option<String>,
    pub triggers: Triggers,
}

impl SessionSnapshot {
    pub fn capture(state: &SessionState, context: &SessionContext) -> Self {
        let (brief, last_error) = match &state.stage {
            Stage::Ignite(s) => (None, s.last_error.clone()),
            Stage::Huddle(_) => (None, None),
            Stage::Build(s) => (Some(s.brief.clone()), None),
        };

        Self {
            generation: context.generation,
            stage: state.stage.kind(),
            busy: state.is_busy(),
            project_idea: state.project_idea.clone(),
            selected_components: state.selected_components.clone(),
            transcript: state.huddle_transcript.clone(),
            brief,
            last_error,
            triggers: Triggers {
                draw_components: state.can_draw_components(),
                generate_idea: state.can_generate_idea(),
                submit_turn: state.can_submit_turn(),
                proceed: state.can_proceed(),
                reset_session: true,
            },
        }
    }
}
