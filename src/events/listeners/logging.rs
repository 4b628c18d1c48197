use async_trait::async_trait;

use crate::events::{Listener, SecurityEvent};

/// Emits security events through the `log` crate.
///
/// Fingerprint mismatches and forced logouts are logged at `warn`;
/// everything else at `info`.
pub struct LoggingListener;

impl LoggingListener {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &SecurityEvent) {
        match event {
            SecurityEvent::FingerprintMismatch { .. }
            | SecurityEvent::ForcedLogout { .. }
            | SecurityEvent::HeartbeatRejected { .. }
            | SecurityEvent::RotationRejected { .. }
            | SecurityEvent::AccessDenied { .. } => {
                log::warn!(target: "teamgate::events", "{}: {:?}", event.name(), event);
            }
            _ => {
                log::info!(target: "teamgate::events", "{}: {:?}", event.name(), event);
            }
        }
    }
}
