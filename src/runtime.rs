//! Runtime owning the live session
//!
//! The runtime task is the only writer of `SessionState`. Renderers talk to
//! it through a cloneable `SessionHandle`: one method per trigger, a
//! read-only snapshot, and a subscription for change notifications.

mod executor;


pub use executor::SessionRuntime;

use crate::catalog;
use crate::llm::AiGateway;
use crate::state_machine::{Event, SessionSnapshot, TransitionError};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// An event plus, for user triggers, where to report acceptance
#[derive(Debug)]
pub struct Command {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<(), TransitionError>>>,
}

impl Command {
    /// Gateway completions nobody waits on
    pub fn internal(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Notifications pushed to subscribers
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    Snapshot(SessionSnapshot),
    Error { message: String },
}

/// Why a trigger did not take effect
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Session runtime has stopped")]
    Stopped,
}

/// Handle to interact with the running session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// Send a trigger and wait until the runtime accepted or rejected it.
    pub async fn dispatch(&self, event: Event) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| DispatchError::Stopped)?;
        reply_rx.await.map_err(|_| DispatchError::Stopped)??;
        Ok(())
    }

    pub async fn draw_components(&self) -> Result<(), DispatchError> {
        let components = catalog::draw_components(&mut rand::thread_rng());
        self.dispatch(Event::DrawComponents { components }).await
    }

    pub async fn generate_idea(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::GenerateIdea).await
    }

    pub async fn submit_turn(&self, text: impl Into<String>) -> Result<(), DispatchError> {
        self.dispatch(Event::SubmitTurn { text: text.into() }).await
    }

    pub async fn proceed(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::Proceed).await
    }

    pub async fn reset_session(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::Reset).await
    }

    /// Current read-only view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that always holds the latest snapshot
    #[allow(dead_code)] // Pull-style observers; the HTTP surface uses `subscribe`
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stream of snapshots and rejected-trigger errors
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a fresh session runtime on the current tokio runtime.
///
/// The task stops once every handle is dropped and no gateway call is
/// still outstanding.
pub fn spawn_session<G: AiGateway + 'static>(gateway: G) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);

    let runtime = SessionRuntime::new(
        gateway,
        command_rx,
        command_tx.downgrade(),
        broadcast_tx.clone(),
    );
    let snapshot_rx = runtime.snapshot_receiver();
    tokio::spawn(runtime.run());

    SessionHandle {
        command_tx,
        snapshot_rx,
        broadcast_tx,
    }
}
