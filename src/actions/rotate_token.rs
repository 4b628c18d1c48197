use chrono::Utc;

use crate::config::TokenConfig;
use crate::crypto::hash_token;
use crate::events::{dispatch, SecurityEvent};
use crate::jwt::{TokenIssuer, TokenPair};
use crate::repository::{
    MembershipRepository, RefreshTokenRepository, RevokeReason, StoreRefreshToken, UserRepository,
};
use crate::AuthError;

/// Exchanges a refresh token for a fresh token pair.
///
/// Rotation is single-use: the presented token is revoked and chained to
/// its replacement, so a replayed token is visibly already-revoked and the
/// chain shows where it went. Memberships are re-read from the database on
/// every rotation, which is how role changes reach a long-lived login.
pub struct RotateTokenAction<U, M, R> {
    user_repo: U,
    membership_repo: M,
    refresh_repo: R,
    issuer: TokenIssuer,
    tokens: TokenConfig,
}

impl<U, M, R> RotateTokenAction<U, M, R>
where
    U: UserRepository,
    M: MembershipRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: U,
        membership_repo: M,
        refresh_repo: R,
        issuer: TokenIssuer,
        tokens: TokenConfig,
    ) -> Self {
        Self {
            user_repo,
            membership_repo,
            refresh_repo,
            issuer,
            tokens,
        }
    }

    #[tracing::instrument(name = "rotate_token", skip_all, err)]
    pub async fn execute(&self, presented: &str, ip: &str) -> Result<TokenPair, AuthError> {
        let row = match self.refresh_repo.find_token(presented).await? {
            Some(row) => row,
            None => {
                self.reject("unknown refresh token").await;
                return Err(AuthError::TokenInvalid);
            }
        };

        if row.revoked_on.is_some() {
            self.reject("revoked refresh token replayed").await;
            return Err(AuthError::TokenInvalid);
        }
        if row.expires_on <= Utc::now() {
            self.reject("expired refresh token").await;
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .user_repo
            .find_user_by_id(row.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active() {
            return Err(AuthError::UserNotFound);
        }
        if let Some(cutoff) = user.force_logout_after {
            if row.created_on < cutoff {
                self.reject("refresh token predates force-logout cutoff")
                    .await;
                return Err(AuthError::ForcedLogout);
            }
        }

        let memberships = self.membership_repo.find_by_user(user.id).await?;
        let claims = memberships.iter().filter_map(|m| m.to_claim()).collect();

        let pair = self
            .issuer
            .issue(&user, claims, row.team_context.as_deref())?;

        let new_hash = hash_token(pair.refresh_token.expose_secret());
        self.refresh_repo
            .store_token(StoreRefreshToken {
                token_hash: new_hash.clone(),
                user_id: user.id,
                team_context: row.team_context.clone(),
                created_by_ip: ip.to_owned(),
                expires_on: Utc::now() + self.tokens.refresh_token_expiry,
            })
            .await?;
        self.refresh_repo
            .revoke_token(
                &row.token_hash,
                RevokeReason::Rotated,
                Some(ip),
                Some(&new_hash),
            )
            .await?;

        dispatch(SecurityEvent::TokenRotated {
            user_id: user.id,
            at: Utc::now(),
        })
        .await;

        Ok(pair)
    }

    async fn reject(&self, reason: &str) {
        tracing::warn!(reason = reason, "token rotation rejected");
        dispatch(SecurityEvent::RotationRejected {
            reason: reason.to_owned(),
            at: Utc::now(),
        })
        .await;
    }
}
