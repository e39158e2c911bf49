//! Session runtime executor

use super::{Command, SessionUpdate};
use crate::llm::AiGateway;
use crate::state_machine::{
    transition, Effect, Event, SessionContext, SessionSnapshot, SessionState, TransitionError,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Runtime that owns one session and executes the effects of its transitions
pub struct SessionRuntime<G>
where
    G: AiGateway + 'static,
{
    context: SessionContext,
    state: SessionState,
    gateway: Arc<G>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so that the runtime alone does not keep its channel open
    command_tx: mpsc::WeakSender<Command>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
}

impl<G> SessionRuntime<G>
where
    G: AiGateway + 'static,
{
    pub fn new(
        gateway: G,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        broadcast_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        let context = SessionContext::default();
        let state = SessionState::default();
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::capture(&state, &context));
        Self {
            context,
            state,
            gateway: Arc::new(gateway),
            command_rx,
            command_tx,
            snapshot_tx,
            broadcast_tx,
        }
    }

    pub fn snapshot_receiver(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn run(mut self) {
        tracing::info!(backend = %self.gateway.backend_name(), "Starting session runtime");

        // One command at a time: this loop is the single mutation point
        while let Some(command) = self.command_rx.recv().await {
            self.process_command(command);
        }

        tracing::info!(generation = self.context.generation, "Session runtime stopped");
    }

    fn process_command(&mut self, command: Command) {
        let Command { event, reply } = command;
        let trigger = event.trigger_name();
        let failure = event
            .failure()
            .map(|(kind, message)| (kind, message.to_string()));
        let result = self.process_event(event);

        if let (Ok(()), Some((kind, message))) = (&result, &failure) {
            tracing::warn!(
                kind = kind.as_str(),
                error = %message,
                "AI request failed, mentor apology shown"
            );
        }

        if let Err(e) = &result {
            match (e, trigger) {
                (TransitionError::StaleResponse { tagged, current }, _) => {
                    tracing::debug!(tagged, current, "Discarding stale AI response");
                }
                (_, Some(trigger)) => {
                    tracing::warn!(trigger, error = %e, "Trigger rejected");
                    let _ = self.broadcast_tx.send(SessionUpdate::Error {
                        message: e.to_string(),
                    });
                }
                (_, None) => {
                    tracing::warn!(error = %e, "Unexpected AI completion");
                }
            }
        }

        if let Some(reply) = reply {
            let _ = reply.send(result);
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        // Pure state transition
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestAi {
                tag,
                system_instruction,
                history,
            } => {
                let Some(command_tx) = self.command_tx.upgrade() else {
                    tracing::warn!(kind = ?tag.kind, "No handles left, skipping AI request");
                    return;
                };
                let gateway = Arc::clone(&self.gateway);

                // Spawn the call; its completion comes back through the command channel
                tokio::spawn(async move {
                    tracing::info!(
                        kind = ?tag.kind,
                        generation = tag.generation,
                        history_len = history.len(),
                        "Making AI request (background)"
                    );

                    let event = match gateway.generate(&system_instruction, &history).await {
                        Ok(text) => Event::AiResponse { tag, text },
                        Err(e) => Event::AiFailure {
                            tag,
                            kind: e.kind,
                            message: e.message,
                        },
                    };
                    let _ = command_tx.send(Command::internal(event)).await;
                });
            }

            Effect::BeginSession => {
                self.context.generation += 1;
                tracing::info!(generation = self.context.generation, "Session reset");
            }

            Effect::NotifySnapshot => {
                let snapshot = SessionSnapshot::capture(&self.state, &self.context);
                self.snapshot_tx.send_replace(snapshot.clone());
                let _ = self.broadcast_tx.send(SessionUpdate::Snapshot(snapshot));
            }
        }
    }
}
