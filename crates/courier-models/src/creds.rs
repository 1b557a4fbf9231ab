//! The opaque credential bundle used to resume a session.

use serde::{Deserialize, Serialize};

/// Authentication material required to resume a session without
/// interactive re-pairing.
///
/// The contents are owned by the transport implementation and opaque to the
/// core; Courier only moves the bundle between the transport and the
/// credential store. Losing an update can render the session unrecoverable,
/// which is why the store persists every update it receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialBundle(serde_json::Value);

impl CredentialBundle {
    /// Wraps transport-owned credential material.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The raw material, for handing back to the transport.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// True when no credential material is present yet (first pairing).
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}
