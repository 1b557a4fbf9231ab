//! The session lifecycle manager and message-ingestion pipeline.

use std::sync::Arc;

use courier_models::{Command, CredentialBundle, MessageBatch, OutboundPayload};
use courier_persistence::CredentialStore;
use courier_provider::Provider;
use courier_transport::{
    Connection, ConnectionHandle, DisconnectReason, Transport, TransportEvent,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::backoff::{ExponentialBackoff, ReconnectPolicy};
use crate::config::{SessionConfig, USAGE_NOTICE};
use crate::dispatch;
use crate::error::Result;
use crate::filter::{self, FilteredMessage};
use crate::resolver;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Establishing or resuming a session.
    Connecting,
    /// Handshake complete; processing messages.
    Open,
    /// Disconnected recoverably; a reconnect attempt is scheduled.
    ClosedRecoverable,
    /// The pairing was invalidated. Absorbing: requires operator
    /// intervention (re-pairing), never auto-retried.
    ClosedTerminal,
}

/// Outcome of driving one connection to its end.
enum Drive {
    Terminal(DisconnectReason),
    Recoverable(DisconnectReason),
}

/// Owns one bot identity's connection state machine and message loop.
///
/// All collaborators are explicit constructor arguments; there is no
/// process-wide state.
pub struct Session {
    transport: Arc<dyn Transport>,
    provider: Arc<dyn Provider>,
    store: CredentialStore,
    config: SessionConfig,
    policy: Arc<dyn ReconnectPolicy>,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl Session {
    /// Creates a session with the default reconnect policy (bounded
    /// exponential backoff with jitter).
    pub fn new(
        transport: Arc<dyn Transport>,
        provider: Arc<dyn Provider>,
        store: CredentialStore,
        config: SessionConfig,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        Self {
            transport,
            provider,
            store,
            config,
            policy: Arc::new(ExponentialBackoff::default()),
            state_tx,
            state_rx,
        }
    }

    /// Replaces the reconnect policy.
    pub fn with_reconnect_policy(mut self, policy: Arc<dyn ReconnectPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// A receiver observing connection-state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Runs the session until the pairing is terminally invalidated.
    ///
    /// Recoverable disconnects re-enter the connecting state after the
    /// backoff policy's delay; the attempt counter resets every time a
    /// connection reaches the open state. Returns `Ok(())` once the session
    /// is terminally closed, or an error if the credential store cannot be
    /// read at startup.
    pub async fn run(&mut self) -> Result<()> {
        let mut creds = self.store.load()?.unwrap_or_default();
        let mut attempt: u32 = 0;

        loop {
            self.set_state(ConnectionState::Connecting);

            let connection = match self.transport.connect(&creds).await {
                Ok(connection) => connection,
                Err(e) => {
                    attempt += 1;
                    let delay = self.policy.delay(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "connect failed, retrying"
                    );
                    self.set_state(ConnectionState::ClosedRecoverable);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            match self.drive(connection, &mut creds, &mut attempt).await {
                Drive::Terminal(reason) => {
                    error!(reason = %reason, "session closed, re-pairing required");
                    self.set_state(ConnectionState::ClosedTerminal);
                    return Ok(());
                }
                Drive::Recoverable(reason) => {
                    attempt += 1;
                    let delay = self.policy.delay(attempt);
                    info!(
                        reason = %reason,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "disconnected, reconnecting"
                    );
                    self.set_state(ConnectionState::ClosedRecoverable);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Consumes one connection's event stream until it closes.
    async fn drive(
        &self,
        mut connection: Connection,
        creds: &mut CredentialBundle,
        attempt: &mut u32,
    ) -> Drive {
        while let Some(event) = connection.events.recv().await {
            match event {
                TransportEvent::Opened => {
                    *attempt = 0;
                    self.set_state(ConnectionState::Open);
                    info!("session open");
                }
                TransportEvent::PairingQr(payload) => {
                    info!(payload = %payload, "pairing required, scan the QR payload");
                }
                TransportEvent::CredentialsUpdated(bundle) => {
                    // Persist before relying on the new material; a missed
                    // persist desynchronizes local and remote session state.
                    if let Err(e) = self.store.save(&bundle) {
                        error!(error = %e, "failed to persist credential update");
                    }
                    *creds = bundle;
                }
                TransportEvent::Messages(batch) => {
                    self.handle_batch(&connection.handle, batch);
                }
                TransportEvent::Closed(reason) => {
                    return if reason.is_recoverable() {
                        Drive::Recoverable(reason)
                    } else {
                        Drive::Terminal(reason)
                    };
                }
            }
        }

        // Event stream ended without a close event; treat it as a lost
        // connection.
        Drive::Recoverable(DisconnectReason::ConnectionLost)
    }

    /// Filters a batch and spawns an independent task for the accepted
    /// message, if any. Each message is its own unit of work; a slow
    /// provider call never blocks the event loop or other conversations.
    fn handle_batch(&self, handle: &Arc<dyn ConnectionHandle>, batch: MessageBatch) {
        let Some(msg) = filter::select_actionable(&batch) else {
            return;
        };

        let handle = Arc::clone(handle);
        let provider = Arc::clone(&self.provider);
        let resolve_names = self.config.resolve_names;

        tokio::spawn(async move {
            handle_message(handle, provider, msg, resolve_names).await;
        });
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }
}

/// Processes one accepted message end to end. Every failure is contained
/// here; the next inbound event must be unaffected no matter what happens.
async fn handle_message(
    handle: Arc<dyn ConnectionHandle>,
    provider: Arc<dyn Provider>,
    msg: FilteredMessage,
    resolve_names: bool,
) {
    if resolve_names {
        resolver::log_sender(handle.as_ref(), &msg).await;
    } else {
        debug!(conversation = %msg.conversation, text = %msg.text, "message received");
    }

    // Not addressed to the bot; silently ignored.
    let Some(command) = Command::parse(&msg.text) else {
        return;
    };

    if !command.has_prompt() {
        // Bare prefix: answer with usage guidance instead of forwarding an
        // empty prompt to the provider.
        dispatch::deliver(
            handle.as_ref(),
            &msg.conversation,
            Ok(OutboundPayload::text(USAGE_NOTICE)),
        )
        .await;
        return;
    }

    let outcome = match &command {
        Command::Complete(prompt) => provider.complete(prompt).await.map(OutboundPayload::text),
        Command::Image(prompt) => provider
            .generate_image(prompt)
            .await
            .map(|img| OutboundPayload::image(img.data, img.caption)),
    };

    dispatch::deliver(handle.as_ref(), &msg.conversation, outcome).await;
}
