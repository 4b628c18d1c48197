use chrono::Utc;

use crate::events::{dispatch, SecurityEvent};
use crate::repository::{RefreshTokenRepository, RevokeReason};
use crate::AuthError;

/// Revokes every refresh token a user holds.
///
/// Used on password change and explicit logout-everywhere. Unlike
/// force-logout this leaves sessions and access tokens alone; the login
/// simply cannot be extended once the current access token expires.
pub struct RevokeAllTokensAction<R> {
    refresh_repo: R,
}

impl<R> RevokeAllTokensAction<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: R) -> Self {
        Self { refresh_repo }
    }

    #[tracing::instrument(name = "revoke_all_tokens", skip_all, fields(user_id = user_id), err)]
    pub async fn execute(&self, user_id: i64, reason: RevokeReason) -> Result<(), AuthError> {
        self.refresh_repo
            .revoke_all_user_tokens(user_id, reason)
            .await?;

        dispatch(SecurityEvent::AllTokensRevoked {
            user_id,
            reason,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
