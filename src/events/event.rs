use chrono::{DateTime, Utc};

use crate::repository::RevokeReason;

/// Security events emitted by teamgate actions and policy evaluation.
///
/// If no listeners are registered,
/// they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // sessions
    SessionOpened {
        user_id: i64,
        session_id: i64,
        at: DateTime<Utc>,
    },
    HeartbeatRejected {
        user_id: i64,
        reason: String,
        at: DateTime<Utc>,
    },
    FingerprintMismatch {
        user_id: i64,
        session_id: i64,
        at: DateTime<Utc>,
    },

    // administrative
    ForcedLogout {
        user_id: i64,
        at: DateTime<Utc>,
    },

    // tokens
    TokenRotated {
        user_id: i64,
        at: DateTime<Utc>,
    },
    RotationRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    AllTokensRevoked {
        user_id: i64,
        reason: RevokeReason,
        at: DateTime<Utc>,
    },
    ContextRefreshed {
        user_id: i64,
        subdomain: String,
        at: DateTime<Utc>,
    },

    // authorization
    AccessDenied {
        user_id: Option<i64>,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl SecurityEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionOpened { .. } => "session.opened",
            Self::HeartbeatRejected { .. } => "session.heartbeat.rejected",
            Self::FingerprintMismatch { .. } => "session.fingerprint.mismatch",
            Self::ForcedLogout { .. } => "session.forced_logout",
            Self::TokenRotated { .. } => "token.rotated",
            Self::RotationRejected { .. } => "token.rotation.rejected",
            Self::AllTokensRevoked { .. } => "token.all_revoked",
            Self::ContextRefreshed { .. } => "token.context_refreshed",
            Self::AccessDenied { .. } => "access.denied",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionOpened { at, .. }
            | Self::HeartbeatRejected { at, .. }
            | Self::FingerprintMismatch { at, .. }
            | Self::ForcedLogout { at, .. }
            | Self::TokenRotated { at, .. }
            | Self::RotationRejected { at, .. }
            | Self::AllTokensRevoked { at, .. }
            | Self::ContextRefreshed { at, .. }
            | Self::AccessDenied { at, .. } => *at,
        }
    }
}
