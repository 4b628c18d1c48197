use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// A platform user's identity record.
///
/// Users are never hard-deleted; `deleted_at` is a soft-delete marker so
/// audit chains stay intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Platform-wide principal that bypasses team-scoped checks.
    pub is_global_admin: bool,
    /// Updated on login and every successful heartbeat.
    pub last_activity_on: DateTime<Utc>,
    /// Any token or session issued before this instant is invalid.
    /// Set by administrative force-logout; enforced lazily on the next
    /// validation, not by revoking in-flight requests.
    pub force_logout_after: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlatformUser {
    /// Returns true if the user can authenticate at all.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Returns true if a token issued at `issued_at` predates an
    /// administrative force-logout.
    pub fn is_forced_out(&self, issued_at: DateTime<Utc>) -> bool {
        self.force_logout_after
            .is_some_and(|cutoff| issued_at < cutoff)
    }
}

#[cfg(any(test, feature = "mocks"))]
impl PlatformUser {
    pub fn mock(id: i64) -> Self {
        let now = Utc::now();
        PlatformUser {
            id,
            email: "kim@example.com".to_owned(),
            first_name: "Kim".to_owned(),
            last_name: "Lee".to_owned(),
            is_global_admin: false,
            last_activity_on: now,
            force_logout_after: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<PlatformUser>, AuthError>;
    /// Records that the user was just seen (login, heartbeat).
    async fn touch_last_activity(&self, user_id: i64) -> Result<(), AuthError>;
    /// Marks the instant before which all of the user's tokens and sessions
    /// are invalid.
    async fn set_force_logout_after(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<(), AuthError>;
    async fn soft_delete_user(&self, user_id: i64) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_force_logout_cutoff() {
        let mut user = PlatformUser::mock(1);
        let now = Utc::now();

        assert!(!user.is_forced_out(now));

        user.force_logout_after = Some(now);
        assert!(user.is_forced_out(now - Duration::minutes(5)));
        // Tokens issued after the cutoff stay valid.
        assert!(!user.is_forced_out(now + Duration::seconds(1)));
    }

    #[test]
    fn test_soft_deleted_user_inactive() {
        let mut user = PlatformUser::mock(1);
        assert!(user.is_active());
        user.deleted_at = Some(Utc::now());
        assert!(!user.is_active());
    }
}
