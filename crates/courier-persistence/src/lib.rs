//! Crash-safe credential persistence for Courier.
//!
//! The session's credential bundle must survive process crashes intact:
//! a partially written bundle desynchronizes local and remote session state
//! and forces interactive re-pairing. Saves therefore go through an atomic
//! write-temp-then-rename sequence.
//!
//! # Example
//!
//! ```no_run
//! use courier_models::CredentialBundle;
//! use courier_persistence::CredentialStore;
//!
//! let store = CredentialStore::new("auth_state");
//!
//! // Reload on startup; None means the transport must pair interactively.
//! let bundle = store.load().unwrap();
//!
//! // Persist every update the transport reports.
//! store.save(&bundle.unwrap_or_default()).unwrap();
//! ```

pub mod error;
pub mod store;

pub use error::{PersistenceError, Result};
pub use store::CredentialStore;
