use chrono::Utc;

use crate::events::{dispatch, SecurityEvent};
use crate::jwt::AccessClaims;
use crate::repository::{RefreshTokenRepository, RevokeReason, UserRepository};
use crate::session::{Fingerprint, SessionRepository};
use crate::AuthError;

/// Periodic proof-of-life check for an open session.
///
/// The heartbeat is where deferred security decisions land: force-logout
/// cutoffs and fingerprint mismatches are both detected here rather than at
/// the moment they arise, so enforcement never races a login that is still
/// in flight.
pub struct HeartbeatAction<U, S, R> {
    user_repo: U,
    session_repo: S,
    refresh_repo: R,
}

impl<U, S, R> HeartbeatAction<U, S, R>
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

    #[tracing::instrument(name = "heartbeat", skip_all, err)]
    pub async fn execute(
        &self,
        claims: &AccessClaims,
        presented: &Fingerprint,
    ) -> Result<(), AuthError> {
        let user_id = claims.user_id()?;

        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            return Err(AuthError::UserNotFound);
        }

        if user.is_forced_out(claims.issued_at()) {
            dispatch(SecurityEvent::HeartbeatRejected {
                user_id,
                reason: "token issued before force-logout cutoff".to_owned(),
                at: Utc::now(),
            })
            .await;
            return Err(AuthError::ForcedLogout);
        }

        let session = self
            .session_repo
            .find_active_by_user(user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.fingerprint_matches(presented) {
            // The binding broke: either the token leaked to another device
            // or the environment changed out from under us. End every
            // session the user holds, not just the newest one, so a stale
            // row left behind by an earlier login cannot become the active
            // session and validate the rejected device's next heartbeat.
            self.session_repo.deactivate_all_for_user(user_id).await?;
            self.refresh_repo
                .revoke_all_user_tokens(user_id, RevokeReason::FingerprintMismatch)
                .await?;

            dispatch(SecurityEvent::FingerprintMismatch {
                user_id,
                session_id: session.id,
                at: Utc::now(),
            })
            .await;
            return Err(AuthError::FingerprintMismatch);
        }

        self.session_repo.touch_session(session.id).await?;
        self.user_repo.touch_last_activity(user_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{JwtConfig, TokenIssuer};
    use crate::repository::{MockRefreshTokenRepository, MockUserRepository, PlatformUser};
    use crate::session::InMemorySessionRepository;
    use chrono::Duration;

    fn fingerprint() -> Fingerprint {
        Fingerprint::from_raw("ua|en-US|UTC|1920x1080", 2000)
    }

    fn claims_for(user: &PlatformUser) -> AccessClaims {
        let issuer = TokenIssuer::new(JwtConfig::new("test-secret-32-bytes-long-key-01").unwrap());
        let pair = issuer.issue(user, vec![], None).unwrap();
        issuer.decode(&pair.access_token).unwrap()
    }

    fn action(
        users: MockUserRepository,
        sessions: InMemorySessionRepository,
    ) -> HeartbeatAction<MockUserRepository, InMemorySessionRepository, MockRefreshTokenRepository>
    {
        HeartbeatAction::new(users, sessions, MockRefreshTokenRepository::new())
    }

    #[tokio::test]
    async fn test_heartbeat_touches_session() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let sessions = InMemorySessionRepository::new();
        let session = sessions
            .create_session(1, fingerprint().as_str())
            .await
            .unwrap();
        let action = action(MockUserRepository::new().with_user(user), sessions);

        let before = session.last_active_on;
        action.execute(&claims, &fingerprint()).await.unwrap();

        let after = action
            .session_repo
            .find_active_by_user(1)
            .await
            .unwrap()
            .unwrap();
        assert!(after.last_active_on >= before);
        assert!(after.is_active);
    }

    #[tokio::test]
    async fn test_heartbeat_without_session() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            InMemorySessionRepository::new(),
        );

        let result = action.execute(&claims, &fingerprint()).await;
        assert_eq!(result.unwrap_err(), AuthError::SessionNotFound);
    }

    #[tokio::test]
    async fn test_fingerprint_mismatch_ends_session_and_revokes_tokens() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let sessions = InMemorySessionRepository::new();
        sessions
            .create_session(1, fingerprint().as_str())
            .await
            .unwrap();
        let action = action(MockUserRepository::new().with_user(user), sessions);

        action
            .refresh_repo
            .store_token(crate::repository::StoreRefreshToken {
                token_hash: "hash".to_owned(),
                user_id: 1,
                team_context: None,
                created_by_ip: "10.0.0.1".to_owned(),
                expires_on: Utc::now() + Duration::days(7),
            })
            .await
            .unwrap();

        let other = Fingerprint::from_raw("ua|fr-FR|CET|800x600", 2000);
        let result = action.execute(&claims, &other).await;

        assert_eq!(result.unwrap_err(), AuthError::FingerprintMismatch);
        assert!(action
            .session_repo
            .find_active_by_user(1)
            .await
            .unwrap()
            .is_none());
        assert_eq!(action.refresh_repo.active_count(1), 0);
    }

    #[tokio::test]
    async fn test_stale_device_stays_rejected_after_mismatch() {
        // Two logins leave two active sessions. When the older device
        // heartbeats, it mismatches the newest session and must not find
        // its own stale row still active on the retry.
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let sessions = InMemorySessionRepository::new();
        let stale = fingerprint();
        sessions.create_session(1, stale.as_str()).await.unwrap();
        let newer = Fingerprint::from_raw("ua2|de-DE|CET|1280x720", 2000);
        sessions.create_session(1, newer.as_str()).await.unwrap();
        let action = action(MockUserRepository::new().with_user(user), sessions);

        let result = action.execute(&claims, &stale).await;
        assert_eq!(result.unwrap_err(), AuthError::FingerprintMismatch);

        let retry = action.execute(&claims, &stale).await;
        assert_eq!(retry.unwrap_err(), AuthError::SessionNotFound);
        assert!(action.session_repo.all().iter().all(|s| !s.is_active));
    }

    #[tokio::test]
    async fn test_token_issued_before_cutoff_is_forced_out() {
        let mut user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        user.force_logout_after = Some(Utc::now() + Duration::seconds(5));
        let sessions = InMemorySessionRepository::new();
        sessions
            .create_session(1, fingerprint().as_str())
            .await
            .unwrap();
        let action = action(MockUserRepository::new().with_user(user), sessions);

        let result = action.execute(&claims, &fingerprint()).await;
        assert_eq!(result.unwrap_err(), AuthError::ForcedLogout);
    }

    #[tokio::test]
    async fn test_token_issued_after_cutoff_survives() {
        let mut user = PlatformUser::mock(1);
        user.force_logout_after = Some(Utc::now() - Duration::hours(1));
        let claims = claims_for(&user);
        let sessions = InMemorySessionRepository::new();
        sessions
            .create_session(1, fingerprint().as_str())
            .await
            .unwrap();
        let action = action(MockUserRepository::new().with_user(user), sessions);

        assert!(action.execute(&claims, &fingerprint()).await.is_ok());
    }
}
