use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::codec::{decode_memberships, MembershipClaim};
use crate::AuthError;

/// Claims embedded in an access token.
///
/// The membership list is carried as a compact encoded string (see
/// [`crate::jwt::codec`]); use [`AccessClaims::memberships`] to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - the user ID.
    pub sub: String,
    /// Email address, for display identity.
    pub email: String,
    /// Given name, for display identity.
    #[serde(default)]
    pub given_name: String,
    /// Family name, for display identity.
    #[serde(default)]
    pub family_name: String,
    /// `"true"` when the user is a platform-wide administrator.
    #[serde(rename = "is_global_admin", default = "default_false")]
    pub is_global_admin: String,
    /// Encoded membership list.
    #[serde(rename = "team_memberships", default)]
    pub memberships: String,
    /// Unique token id, for anti-replay and audit.
    pub jti: String,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issuer (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

fn default_false() -> String {
    "false".to_owned()
}

impl AccessClaims {
    /// Returns the user ID from the claims.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenInvalid)
    }

    /// Returns true if the token asserts platform-admin privileges.
    pub fn is_global_admin(&self) -> bool {
        self.is_global_admin == "true"
    }

    /// Decodes the membership list. Fail-soft: malformed claims yield an
    /// empty list, which downstream evaluation treats as "no access".
    pub fn memberships(&self) -> Vec<MembershipClaim> {
        decode_memberships(&self.memberships)
    }

    /// Returns the issuance instant.
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
