//! Local development transport backed by standard input and output.
//!
//! Each stdin line becomes a live direct message from a fixed operator
//! conversation; replies are printed to stdout. Useful for exercising the
//! whole pipeline without pairing a real messaging account. Closing stdin
//! ends the session terminally, like a revoked pairing would.

use std::sync::Arc;

use async_trait::async_trait;
use courier_models::{ConversationId, CredentialBundle, InboundMessage, MessageBatch, OutboundPayload};
use courier_transport::{
    Connection, ConnectionHandle, DisconnectReason, Result, Transport, TransportError,
    TransportEvent, EVENT_CHANNEL_CAPACITY,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Conversation identifier attributed to everything typed on stdin.
const OPERATOR_CONVERSATION: &str = "operator@local";

pub struct StdioTransport;

#[async_trait]
impl Transport for StdioTransport {
    async fn connect(&self, _creds: &CredentialBundle) -> Result<Connection> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            if tx.send(TransportEvent::Opened).await.is_err() {
                return;
            }

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let msg = InboundMessage::direct_text(OPERATOR_CONVERSATION, line);
                        let batch = MessageBatch::notify(vec![msg]);
                        if tx.send(TransportEvent::Messages(batch)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        debug!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }

            // Stdin is gone; nothing to reconnect to.
            let _ = tx
                .send(TransportEvent::Closed(DisconnectReason::LoggedOut))
                .await;
        });

        Ok(Connection {
            events: rx,
            handle: Arc::new(StdioHandle),
        })
    }
}

struct StdioHandle;

#[async_trait]
impl ConnectionHandle for StdioHandle {
    async fn send(&self, to: &ConversationId, payload: OutboundPayload) -> Result<()> {
        match payload {
            OutboundPayload::Text(text) => println!("-> {to}: {text}"),
            OutboundPayload::Image { data, caption } => {
                println!("-> {to}: [image, {} bytes] {caption}", data.len());
            }
        }
        Ok(())
    }

    async fn group_subject(&self, group: &ConversationId) -> Result<String> {
        Err(TransportError::LookupFailed(format!(
            "no group metadata for {group}"
        )))
    }

    async fn display_name(&self, _id: &str) -> Result<String> {
        Ok("operator".to_string())
    }
}
