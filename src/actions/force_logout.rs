use chrono::Utc;

use crate::events::{dispatch, SecurityEvent};
use crate::repository::{RefreshTokenRepository, RevokeReason, UserRepository};
use crate::session::SessionRepository;
use crate::AuthError;

/// Administrative kill switch for one user's access.
///
/// Sets a cutoff on the user record so access tokens issued before it stop
/// working at their next heartbeat, revokes every refresh token, and
/// deactivates every session. Authorization (who may pull the switch) is
/// checked by the caller against the platform-admin policy.
pub struct ForceLogoutAction<U, S, R> {
    user_repo: U,
    session_repo: S,
    refresh_repo: R,
}

impl<U, S, R> ForceLogoutAction<U, S, R>
where
    U: UserRepository,
    S: SessionRepository,
    R: RefreshTokenRepository,
{
    pub fn new(user_repo: U, session_repo: S, refresh_repo: R) -> Self {
        Self {
            user_repo,
            session_repo,
            refresh_repo,
        }
    }

    #[tracing::instrument(name = "force_logout", skip_all, fields(target_user_id = target_user_id), err)]
    pub async fn execute(&self, target_user_id: i64) -> Result<(), AuthError> {
        let cutoff = Utc::now();

        // The cutoff goes in first. Once it is visible, no token issued
        // before this moment passes another heartbeat, even if the revoke
        // or deactivate below fails and has to be retried.
        self.user_repo
            .set_force_logout_after(target_user_id, cutoff)
            .await?;

        self.refresh_repo
            .revoke_all_user_tokens(target_user_id, RevokeReason::ForcedLogout)
            .await?;
        self.session_repo
            .deactivate_all_for_user(target_user_id)
            .await?;

        dispatch(SecurityEvent::ForcedLogout {
            user_id: target_user_id,
            at: cutoff,
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockRefreshTokenRepository, MockUserRepository, PlatformUser, StoreRefreshToken};
    use crate::session::InMemorySessionRepository;
    use chrono::Duration;

    #[tokio::test]
    async fn test_force_logout_cuts_everything() {
        let users = MockUserRepository::new().with_user(PlatformUser::mock(1));
        let sessions = InMemorySessionRepository::new();
        sessions.create_session(1, "fp1").await.unwrap();
        sessions.create_session(1, "fp2").await.unwrap();
        let refresh = MockRefreshTokenRepository::new();
        refresh
            .store_token(StoreRefreshToken {
                token_hash: "hash".to_owned(),
                user_id: 1,
                team_context: None,
                created_by_ip: "10.0.0.1".to_owned(),
                expires_on: Utc::now() + Duration::days(7),
            })
            .await
            .unwrap();

        let action = ForceLogoutAction::new(users, sessions, refresh);
        action.execute(1).await.unwrap();

        let user = action.user_repo.find_user_by_id(1).await.unwrap().unwrap();
        assert!(user.force_logout_after.is_some());
        assert!(action
            .session_repo
            .find_active_by_user(1)
            .await
            .unwrap()
            .is_none());
        assert_eq!(action.refresh_repo.active_count(1), 0);
    }

    #[tokio::test]
    async fn test_force_logout_unknown_user() {
        let action = ForceLogoutAction::new(
            MockUserRepository::new(),
            InMemorySessionRepository::new(),
            MockRefreshTokenRepository::new(),
        );

        let result = action.execute(99).await;
        assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_other_users_unaffected() {
        let users = MockUserRepository::new()
            .with_user(PlatformUser::mock(1))
            .with_user(PlatformUser::mock(2));
        let sessions = InMemorySessionRepository::new();
        sessions.create_session(1, "fp1").await.unwrap();
        sessions.create_session(2, "fp2").await.unwrap();

        let action = ForceLogoutAction::new(users, sessions, MockRefreshTokenRepository::new());
        action.execute(1).await.unwrap();

        assert!(action
            .session_repo
            .find_active_by_user(2)
            .await
            .unwrap()
            .is_some());
        let other = action.user_repo.find_user_by_id(2).await.unwrap().unwrap();
        assert!(other.force_logout_after.is_none());
    }
}
