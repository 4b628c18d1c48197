use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AuthError;

/// Why a refresh token was revoked. Persisted for the audit chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeReason {
    /// Replaced during normal rotation.
    Rotated,
    PasswordChanged,
    FingerprintMismatch,
    ForcedLogout,
    UserLoggedOut,
}

impl fmt::Display for RevokeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rotated => "rotated",
            Self::PasswordChanged => "password_changed",
            Self::FingerprintMismatch => "fingerprint_mismatch",
            Self::ForcedLogout => "forced_logout",
            Self::UserLoggedOut => "user_logged_out",
        };
        f.write_str(s)
    }
}

/// A persisted refresh token row.
///
/// Rows are stored by token hash, never plaintext. Rotation forms an
/// auditable chain: the old row's `replaced_by_token` points at the hash of
/// its successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// SHA-256 hash of the token value.
    pub token_hash: String,
    pub user_id: i64,
    /// Tenant subdomain the pair was scoped to, if any.
    pub team_context: Option<String>,
    pub created_on: DateTime<Utc>,
    pub created_by_ip: String,
    pub expires_on: DateTime<Utc>,
    pub revoked_on: Option<DateTime<Utc>>,
    pub revoked_by_ip: Option<String>,
    pub replaced_by_token: Option<String>,
    pub reason_revoked: Option<RevokeReason>,
}

impl RefreshToken {
    /// A token is active while it is unrevoked and unexpired.
    pub fn is_active(&self) -> bool {
        self.revoked_on.is_none() && self.expires_on > Utc::now()
    }
}

/// Parameters for inserting a new refresh token row.
#[derive(Debug, Clone)]
pub struct StoreRefreshToken {
    pub token_hash: String,
    pub user_id: i64,
    pub team_context: Option<String>,
    pub created_by_ip: String,
    pub expires_on: DateTime<Utc>,
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn store_token(&self, data: StoreRefreshToken) -> Result<RefreshToken, AuthError>;
    /// Looks up by the plaintext token value; implementations hash internally.
    async fn find_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;
    /// Revokes one token, optionally chaining to its replacement's hash.
    async fn revoke_token(
        &self,
        token_hash: &str,
        reason: RevokeReason,
        revoked_by_ip: Option<&str>,
        replaced_by_hash: Option<&str>,
    ) -> Result<(), AuthError>;
    /// Revokes every currently-active token for a user.
    async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        reason: RevokeReason,
    ) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_in: Duration) -> RefreshToken {
        RefreshToken {
            token_hash: "hash".to_owned(),
            user_id: 1,
            team_context: None,
            created_on: Utc::now(),
            created_by_ip: "127.0.0.1".to_owned(),
            expires_on: Utc::now() + expires_in,
            revoked_on: None,
            revoked_by_ip: None,
            replaced_by_token: None,
            reason_revoked: None,
        }
    }

    #[test]
    fn test_active_token() {
        assert!(token(Duration::days(7)).is_active());
    }

    #[test]
    fn test_expired_token_inactive() {
        assert!(!token(Duration::seconds(-1)).is_active());
    }

    #[test]
    fn test_revoked_token_inactive() {
        let mut t = token(Duration::days(7));
        t.revoked_on = Some(Utc::now());
        t.reason_revoked = Some(RevokeReason::Rotated);
        assert!(!t.is_active());
    }
}
