use async_trait::async_trait;

use super::SecurityEvent;

/// Trait for handling security events asynchronously.
///
/// Implement this trait to create custom event listeners: shipping audit
/// records, updating metrics, alerting on fingerprint mismatches, etc.
///
/// # Example
///
/// ```rust,ignore
/// use teamgate::events::{SecurityEvent, Listener};
/// use async_trait::async_trait;
///
/// struct AlertListener;
///
/// #[async_trait]
/// impl Listener for AlertListener {
///     async fn handle(&self, event: &SecurityEvent) {
///         if let SecurityEvent::FingerprintMismatch { user_id, .. } = event {
///             // page whoever is on call
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handle a security event.
    ///
    /// Called for every event dispatched. Filter by matching on the event
    /// variant to handle specific events.
    async fn handle(&self, event: &SecurityEvent);
}
