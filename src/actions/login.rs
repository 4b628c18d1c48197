use chrono::Utc;

use crate::config::{SessionConfig, TokenConfig};
use crate::crypto::hash_token;
use crate::events::{dispatch, SecurityEvent};
use crate::jwt::{TokenIssuer, TokenPair};
use crate::repository::{MembershipRepository, RefreshTokenRepository, StoreRefreshToken, UserRepository};
use crate::session::{DeviceSession, Fingerprint, FingerprintParts, SessionRepository};
use crate::AuthError;

/// Result of a successful login: the opened session and the token pair.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub session: DeviceSession,
    pub tokens: TokenPair,
}

/// Opens a fingerprint-bound session and issues the first token pair.
///
/// The caller has already verified the user's identity (password check or
/// an external provider); this action only handles the session security
/// side. An earlier active session with a different fingerprint is left
/// alone here: the mismatch is detected and acted on at that session's next
/// heartbeat, which is the race-free point to revoke.
pub struct LoginAction<U, S, M, R> {
    user_repo: U,
    session_repo: S,
    membership_repo: M,
    refresh_repo: R,
    issuer: TokenIssuer,
    tokens: TokenConfig,
    session: SessionConfig,
}

impl<U, S, M, R> LoginAction<U, S, M, R>
where
    U: UserRepository,
    S: SessionRepository,
    M: MembershipRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: U,
        session_repo: S,
        membership_repo: M,
        refresh_repo: R,
        issuer: TokenIssuer,
        tokens: TokenConfig,
        session: SessionConfig,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            membership_repo,
            refresh_repo,
            issuer,
            tokens,
            session,
        }
    }

    #[tracing::instrument(name = "login", skip_all, fields(user_id = user_id), err)]
    pub async fn execute(
        &self,
        user_id: i64,
        fingerprint_parts: &FingerprintParts,
        ip: &str,
    ) -> Result<LoginOutput, AuthError> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            return Err(AuthError::UserNotFound);
        }

        let fingerprint =
            Fingerprint::derive(fingerprint_parts, self.session.max_fingerprint_length);
        let session = self
            .session_repo
            .create_session(user.id, fingerprint.as_str())
            .await?;

        let memberships = self.membership_repo.find_by_user(user.id).await?;
        let claims = memberships.iter().filter_map(|m| m.to_claim()).collect();

        let tokens = self.issuer.issue(&user, claims, None)?;

        self.refresh_repo
            .store_token(StoreRefreshToken {
                token_hash: hash_token(tokens.refresh_token.expose_secret()),
                user_id: user.id,
                team_context: None,
                created_by_ip: ip.to_owned(),
                expires_on: Utc::now() + self.tokens.refresh_token_expiry,
            })
            .await?;

        self.user_repo.touch_last_activity(user.id).await?;

        dispatch(SecurityEvent::SessionOpened {
            user_id: user.id,
            session_id: session.id,
            at: Utc::now(),
        })
        .await;

        Ok(LoginOutput { session, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{JwtConfig, MemberType, TeamRole};
    use crate::repository::{MockMembershipRepository, MockRefreshTokenRepository, MockUserRepository, PlatformUser};
    use crate::session::InMemorySessionRepository;

    fn parts() -> FingerprintParts {
        FingerprintParts {
            user_agent: "Mozilla/5.0".to_owned(),
            language: "en-US".to_owned(),
            timezone: "UTC".to_owned(),
            screen_size: "1920x1080".to_owned(),
        }
    }

    fn action(
        users: MockUserRepository,
        memberships: MockMembershipRepository,
    ) -> LoginAction<
        MockUserRepository,
        InMemorySessionRepository,
        MockMembershipRepository,
        MockRefreshTokenRepository,
    > {
        LoginAction::new(
            users,
            InMemorySessionRepository::new(),
            memberships,
            MockRefreshTokenRepository::new(),
            TokenIssuer::new(JwtConfig::new("test-secret-32-bytes-long-key-01").unwrap()),
            TokenConfig::default(),
            SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_login_opens_session_and_issues_tokens() {
        let users = MockUserRepository::new().with_user(PlatformUser::mock(1));
        let memberships = MockMembershipRepository::new().with_membership(
            1,
            5,
            "eagles",
            TeamRole::Owner,
            MemberType::Coach,
        );
        let action = action(users, memberships);

        let output = action.execute(1, &parts(), "10.0.0.1").await.unwrap();

        assert!(output.session.is_active);
        assert_eq!(output.session.user_id, 1);
        assert!(!output.tokens.access_token.is_empty());

        // The refresh token was persisted hashed.
        let stored = action
            .refresh_repo
            .find_token(output.tokens.refresh_token.expose_secret())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, 1);
        assert_ne!(
            stored.token_hash,
            output.tokens.refresh_token.expose_secret()
        );
    }

    #[tokio::test]
    async fn test_login_embeds_current_memberships() {
        let users = MockUserRepository::new().with_user(PlatformUser::mock(1));
        let memberships = MockMembershipRepository::new()
            .with_membership(1, 5, "eagles", TeamRole::Owner, MemberType::Coach)
            .with_membership(1, 6, "hawks", TeamRole::Member, MemberType::Parent);
        let action = action(users, memberships);

        let output = action.execute(1, &parts(), "10.0.0.1").await.unwrap();
        let claims = action.issuer.decode(&output.tokens.access_token).unwrap();
        assert_eq!(claims.memberships().len(), 2);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let action = action(MockUserRepository::new(), MockMembershipRepository::new());
        let result = action.execute(99, &parts(), "10.0.0.1").await;
        assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_login_soft_deleted_user_rejected() {
        let mut user = PlatformUser::mock(1);
        user.deleted_at = Some(Utc::now());
        let users = MockUserRepository::new().with_user(user);
        let action = action(users, MockMembershipRepository::new());

        let result = action.execute(1, &parts(), "10.0.0.1").await;
        assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_second_login_keeps_stale_session_active() {
        // The stale session is only caught at its next heartbeat.
        let users = MockUserRepository::new().with_user(PlatformUser::mock(1));
        let action = action(users, MockMembershipRepository::new());

        action.execute(1, &parts(), "10.0.0.1").await.unwrap();

        let mut other = parts();
        other.timezone = "Europe/Berlin".to_owned();
        action.execute(1, &other, "10.0.0.2").await.unwrap();

        let active: Vec<_> = action
            .session_repo
            .all()
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        assert_eq!(active.len(), 2);
    }
}
