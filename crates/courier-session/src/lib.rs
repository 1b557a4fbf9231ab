//! Session lifecycle and command pipeline for Courier.
//!
//! This crate is the core of the bot. It owns the connection state machine
//! (connecting, open, recoverably closed, terminally closed), persists every
//! credential update before relying on it, and runs the per-message
//! pipeline: filter inbound events, resolve sender identity for the log
//! line, route recognized commands to the AI provider, and dispatch the
//! result (or an apology) back into the originating conversation.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use courier_persistence::CredentialStore;
//! use courier_session::{Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(MyTransportBinding::new());
//!     let provider = Arc::new(courier_provider::OpenAiClient::from_env()?);
//!     let store = CredentialStore::new("auth_state");
//!
//!     let mut session = Session::new(transport, provider, store, SessionConfig::default());
//!
//!     // Runs until the pairing is terminally invalidated.
//!     session.run().await?;
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod resolver;
pub mod session;

pub use backoff::{ExponentialBackoff, Immediate, ReconnectPolicy};
pub use config::{SessionConfig, APOLOGY_TEXT, USAGE_NOTICE};
pub use error::{Result, SessionError};
pub use filter::{select_actionable, FilteredMessage};
pub use resolver::ResolvedName;
pub use session::{ConnectionState, Session};
