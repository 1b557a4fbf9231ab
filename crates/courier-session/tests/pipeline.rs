//! End-to-end pipeline tests: a session driven by a scripted transport and
//! a mock provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use courier_models::{
    ConversationId, CredentialBundle, InboundMessage, MessageBatch, OutboundPayload,
};
use courier_persistence::CredentialStore;
use courier_provider::{image_caption, GeneratedImage, Provider, ProviderError};
use courier_session::{
    ConnectionState, Immediate, Session, SessionConfig, APOLOGY_TEXT, USAGE_NOTICE,
};
use courier_transport::{
    Connection, ConnectionHandle, DisconnectReason, Transport, TransportEvent,
    EVENT_CHANNEL_CAPACITY,
};
use tokio::sync::mpsc;

/// Records everything sent through the connection.
#[derive(Default)]
struct RecordingHandle {
    sent: Mutex<Vec<(ConversationId, OutboundPayload)>>,
}

impl RecordingHandle {
    fn sent(&self) -> Vec<(ConversationId, OutboundPayload)> {
        self.sent.lock().unwrap().clone()
    }

    /// Spawned message tasks may finish after the session run returns, so
    /// poll briefly instead of asserting immediately.
    async fn wait_for_sends(&self, n: usize) {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl ConnectionHandle for RecordingHandle {
    async fn send(
        &self,
        to: &ConversationId,
        payload: OutboundPayload,
    ) -> courier_transport::Result<()> {
        self.sent.lock().unwrap().push((to.clone(), payload));
        Ok(())
    }

    async fn group_subject(&self, _group: &ConversationId) -> courier_transport::Result<String> {
        Ok("Cycling Club".to_string())
    }

    async fn display_name(&self, _id: &str) -> courier_transport::Result<String> {
        Ok("Ada".to_string())
    }
}

/// Transport that replays one scripted event sequence per connect call.
struct ScriptedTransport {
    scripts: Mutex<VecDeque<Vec<TransportEvent>>>,
    handle: Arc<RecordingHandle>,
    connects: Mutex<u32>,
}

impl ScriptedTransport {
    fn new(scripts: Vec<Vec<TransportEvent>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            handle: Arc::new(RecordingHandle::default()),
            connects: Mutex::new(0),
        }
    }

    fn connect_count(&self) -> u32 {
        *self.connects.lock().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, _creds: &CredentialBundle) -> courier_transport::Result<Connection> {
        *self.connects.lock().unwrap() += 1;
        let events = self.scripts.lock().unwrap().pop_front().unwrap_or_default();

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        });

        Ok(Connection {
            events: rx,
            handle: Arc::clone(&self.handle) as Arc<dyn ConnectionHandle>,
        })
    }
}

/// Provider with a canned completion outcome; image generation always
/// succeeds with a tiny byte payload.
struct MockProvider {
    completion: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    fn answering(text: &str) -> Self {
        Self {
            completion: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            completion: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> courier_provider::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.completion
            .clone()
            .map_err(ProviderError::RequestFailed)
    }

    async fn generate_image(&self, prompt: &str) -> courier_provider::Result<GeneratedImage> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(GeneratedImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            caption: image_caption(prompt),
        })
    }
}

fn session_with(
    transport: Arc<ScriptedTransport>,
    provider: Arc<MockProvider>,
    store: CredentialStore,
) -> Session {
    Session::new(
        transport,
        provider,
        store,
        SessionConfig::default(),
    )
    .with_reconnect_policy(Arc::new(Immediate))
}

async fn run_to_completion(session: &mut Session) {
    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session run timed out")
        .expect("session run failed");
}

fn closing_script(events: Vec<TransportEvent>) -> Vec<Vec<TransportEvent>> {
    let mut events = events;
    events.push(TransportEvent::Closed(DisconnectReason::LoggedOut));
    vec![events]
}

#[tokio::test]
async fn ai_command_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let msg = InboundMessage::direct_text("111@s.whatsapp.net", "./ai What is 2+2?");
    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::Messages(MessageBatch::notify(vec![msg])),
    ])));
    let provider = Arc::new(MockProvider::answering("4."));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;
    transport.handle.wait_for_sends(1).await;

    assert_eq!(provider.prompts(), vec!["What is 2+2?".to_string()]);

    let sent = transport.handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.as_str(), "111@s.whatsapp.net");
    assert_eq!(sent[0].1, OutboundPayload::Text("4.".to_string()));
}

#[tokio::test]
async fn img_command_replies_with_image_and_caption() {
    let dir = tempfile::tempdir().unwrap();
    let msg = InboundMessage::group_text("cycling@g.us", "222@s.whatsapp.net", "./img a red bicycle");
    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::Messages(MessageBatch::notify(vec![msg])),
    ])));
    let provider = Arc::new(MockProvider::answering("unused"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;
    transport.handle.wait_for_sends(1).await;

    assert_eq!(provider.prompts(), vec!["a red bicycle".to_string()]);

    let sent = transport.handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.as_str(), "cycling@g.us");
    match &sent[0].1 {
        OutboundPayload::Image { data, caption } => {
            assert!(!data.is_empty());
            assert!(caption.contains("a red bicycle"));
        }
        other => panic!("expected image payload, got {:?}", other),
    }
}

#[tokio::test]
async fn provider_failure_sends_apology() {
    let dir = tempfile::tempdir().unwrap();
    let msg = InboundMessage::direct_text("111@s.whatsapp.net", "./ai ping");
    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::Messages(MessageBatch::notify(vec![msg])),
    ])));
    let provider = Arc::new(MockProvider::failing("simulated network error"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    // Must complete normally; the provider error stays inside the pipeline.
    run_to_completion(&mut session).await;
    transport.handle.wait_for_sends(1).await;

    let sent = transport.handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, OutboundPayload::Text(APOLOGY_TEXT.to_string()));
}

#[tokio::test]
async fn self_sent_and_non_command_messages_get_no_reply() {
    let dir = tempfile::tempdir().unwrap();
    let mut own = InboundMessage::direct_text("111@s.whatsapp.net", "./ai echo");
    own.from_self = true;
    let chatter = InboundMessage::direct_text("111@s.whatsapp.net", "hello there");

    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::Messages(MessageBatch::notify(vec![own])),
        TransportEvent::Messages(MessageBatch::notify(vec![chatter])),
    ])));
    let provider = Arc::new(MockProvider::answering("never"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;

    // Give any stray task a moment to (wrongly) reply.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(transport.handle.sent().is_empty());
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn bare_prefix_gets_usage_notice() {
    let dir = tempfile::tempdir().unwrap();
    let msg = InboundMessage::direct_text("111@s.whatsapp.net", "./ai   ");
    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::Messages(MessageBatch::notify(vec![msg])),
    ])));
    let provider = Arc::new(MockProvider::answering("never"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;
    transport.handle.wait_for_sends(1).await;

    let sent = transport.handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, OutboundPayload::Text(USAGE_NOTICE.to_string()));
    // The empty prompt never reached the provider.
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn recoverable_disconnect_reconnects() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(ScriptedTransport::new(vec![
        vec![
            TransportEvent::Opened,
            TransportEvent::Closed(DisconnectReason::ConnectionLost),
        ],
        vec![
            TransportEvent::Opened,
            TransportEvent::Closed(DisconnectReason::LoggedOut),
        ],
    ]));
    let provider = Arc::new(MockProvider::answering("unused"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;

    // One fresh start attempt after the recoverable close, none after the
    // terminal one.
    assert_eq!(transport.connect_count(), 2);
    assert_eq!(session.state(), ConnectionState::ClosedTerminal);
}

#[tokio::test]
async fn logged_out_is_absorbing() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(ScriptedTransport::new(vec![vec![
        TransportEvent::Opened,
        TransportEvent::Closed(DisconnectReason::LoggedOut),
    ]]));
    let provider = Arc::new(MockProvider::answering("unused"));

    let mut session = session_with(
        Arc::clone(&transport),
        Arc::clone(&provider),
        CredentialStore::new(dir.path()),
    );
    run_to_completion(&mut session).await;

    assert_eq!(transport.connect_count(), 1);
    assert_eq!(session.state(), ConnectionState::ClosedTerminal);
}

#[tokio::test]
async fn credential_updates_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());
    let bundle = CredentialBundle::new(serde_json::json!({"deviceId": 42}));

    let transport = Arc::new(ScriptedTransport::new(closing_script(vec![
        TransportEvent::Opened,
        TransportEvent::CredentialsUpdated(bundle.clone()),
    ])));
    let provider = Arc::new(MockProvider::answering("unused"));

    let mut session = session_with(Arc::clone(&transport), provider, store.clone());
    run_to_completion(&mut session).await;

    assert_eq!(store.load().unwrap(), Some(bundle));
}
