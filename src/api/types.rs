use serde::{Deserialize, Serialize};

use crate::crypto::SecretString;
use crate::session::FingerprintParts;
use crate::AuthError;

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub fingerprint: FingerprintParts,
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshContextRequest {
    pub subdomain: String,
}

// Response DTOs

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: SecretString,
    pub expires_in: i64,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::InsufficientRole
            | AuthError::NotAMember
            | AuthError::TeamMismatch
            | AuthError::NotGlobalAdmin => "forbidden",
            AuthError::TenantNotFound => "tenant_not_found",
            AuthError::FingerprintMismatch | AuthError::ForcedLogout => "session_ended",
            AuthError::UserNotFound => "user_not_found",
            AuthError::SessionNotFound => "session_not_found",
            AuthError::DatabaseError(_) | AuthError::ConfigurationError(_) => "internal",
        };

        // Backend detail stays in the logs.
        let error = match &err {
            AuthError::DatabaseError(_) | AuthError::ConfigurationError(_) => {
                "Internal server error".to_owned()
            }
            _ => err.to_string(),
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}
