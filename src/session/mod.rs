//! Fingerprint-bound device sessions.
//!
//! One session row is created per login and bound to a client fingerprint.
//! Sessions are deactivated, never deleted, so the audit trail survives
//! logout, fingerprint mismatch, and force-logout.

mod fingerprint;
#[cfg(any(test, feature = "mocks"))]
mod memory_store;
mod repository;

use chrono::{DateTime, Utc};
pub use fingerprint::{Fingerprint, FingerprintParts};
#[cfg(any(test, feature = "mocks"))]
pub use memory_store::InMemorySessionRepository;
pub use repository::SessionRepository;
use serde::{Deserialize, Serialize};

/// A persisted device session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSession {
    pub id: i64,
    pub user_id: i64,
    /// Client-environment digest this session is bound to.
    pub fingerprint: String,
    pub created_on: DateTime<Utc>,
    /// Updated by every successful heartbeat.
    pub last_active_on: DateTime<Utc>,
    pub is_active: bool,
}

impl DeviceSession {
    /// Compares a presented fingerprint against the stored binding.
    pub fn fingerprint_matches(&self, presented: &Fingerprint) -> bool {
        self.fingerprint == presented.as_str()
    }
}
