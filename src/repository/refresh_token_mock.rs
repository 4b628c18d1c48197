#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use super::refresh_token::{RefreshToken, RefreshTokenRepository, RevokeReason, StoreRefreshToken};
use crate::crypto::hash_token;
use crate::AuthError;

#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    pub tokens: Arc<Mutex<Vec<RefreshToken>>>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of currently-active tokens for a user, for assertions.
    pub fn active_count(&self, user_id: i64) -> usize {
        let tokens = self.tokens.lock().unwrap();
        tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.is_active())
            .count()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn store_token(&self, data: StoreRefreshToken) -> Result<RefreshToken, AuthError> {
        let row = RefreshToken {
            token_hash: data.token_hash,
            user_id: data.user_id,
            team_context: data.team_context,
            created_on: Utc::now(),
            created_by_ip: data.created_by_ip,
            expires_on: data.expires_on,
            revoked_on: None,
            revoked_by_ip: None,
            replaced_by_token: None,
            reason_revoked: None,
        };

        let mut tokens = self.tokens.lock().unwrap();
        tokens.push(row.clone());
        drop(tokens);

        Ok(row)
    }

    async fn find_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let hashed = hash_token(token);
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token_hash == hashed).cloned())
    }

    async fn revoke_token(
        &self,
        token_hash: &str,
        reason: RevokeReason,
        revoked_by_ip: Option<&str>,
        replaced_by_hash: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            Some(t) => {
                t.revoked_on = Some(Utc::now());
                t.revoked_by_ip = revoked_by_ip.map(ToOwned::to_owned);
                t.replaced_by_token = replaced_by_hash.map(ToOwned::to_owned);
                t.reason_revoked = Some(reason);
                Ok(())
            }
            None => Err(AuthError::TokenInvalid),
        }
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        reason: RevokeReason,
    ) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        for t in tokens.iter_mut().filter(|t| t.user_id == user_id) {
            if t.revoked_on.is_none() {
                t.revoked_on = Some(Utc::now());
                t.reason_revoked = Some(reason);
            }
        }
        Ok(())
    }
}
