use async_trait::async_trait;

use crate::events::{Listener, SecurityEvent};

/// Emits security events as tracing events.
///
/// # Example
///
/// ```rust,ignore
/// use teamgate::register_event_listeners;
/// use teamgate::events::listeners::TracingListener;
///
/// register_event_listeners(|registry| {
///     registry.listen(TracingListener);
/// });
/// ```
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &SecurityEvent) {
        tracing::info!(
            target: "teamgate::events",
            event_name = event.name(),
            ?event,
            "security event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_tracing_listener_handle() {
        let listener = TracingListener;
        let event = SecurityEvent::SessionOpened {
            user_id: 1,
            session_id: 1,
            at: Utc::now(),
        };

        // should not panic
        listener.handle(&event).await;
    }
}
