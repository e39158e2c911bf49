//! Stage controller for a mentoring session
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! Each stage handler owns the events that make sense in its stage.

mod build;
mod effect;
pub mod event;
mod huddle;
mod ignite;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{AiRequestKind, Event};
pub use state::{
    Brief, BuildStage, HuddleStage, IgniteStage, SessionContext, SessionSnapshot, SessionState,
    Stage,
};
pub use transition::{transition, TransitionError};
