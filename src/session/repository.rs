use async_trait::async_trait;

use super::DeviceSession;
use crate::AuthError;

/// Persistence for device sessions.
///
/// Every mutation keys on a single row, so implementations need ordinary
/// transactional row updates and no distributed locking.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates an active session bound to the given fingerprint.
    async fn create_session(
        &self,
        user_id: i64,
        fingerprint: &str,
    ) -> Result<DeviceSession, AuthError>;

    /// Returns the most recently created active session for a user.
    async fn find_active_by_user(&self, user_id: i64) -> Result<Option<DeviceSession>, AuthError>;

    /// Updates `last_active_on` for a session.
    async fn touch_session(&self, session_id: i64) -> Result<(), AuthError>;

    /// Deactivates one session. Deactivating an already-inactive session is
    /// a no-op, which keeps late heartbeats idempotent.
    async fn deactivate_session(&self, session_id: i64) -> Result<(), AuthError>;

    /// Deactivates every active session for a user.
    async fn deactivate_all_for_user(&self, user_id: i64) -> Result<(), AuthError>;
}
