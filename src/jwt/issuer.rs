use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::AccessClaims;
use super::codec::{encode_memberships, ClaimRole, MembershipClaim};
use super::config::JwtConfig;
use crate::crypto::{generate_refresh_token, generate_token, SecretString};
use crate::repository::PlatformUser;
use crate::AuthError;

/// Length of the JWT ID (jti) in characters.
const JTI_LENGTH: usize = 16;

/// A freshly issued access/refresh token pair.
///
/// The refresh token is the plaintext value handed to the client; only its
/// hash is ever persisted.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Signed access token for API requests.
    pub access_token: String,
    /// Opaque high-entropy refresh token.
    pub refresh_token: SecretString,
    /// Access token expiry in seconds.
    pub expires_in: i64,
}

/// Builds and signs access tokens, and verifies presented ones.
#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    /// Creates a new issuer with the given configuration.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access/refresh token pair for a user.
    ///
    /// `asserted_context` names the tenant subdomain the token is being
    /// scoped to, when one is (e.g. on a context refresh). When the user is
    /// a platform admin and no context is asserted, an administrative
    /// pseudo-membership is injected so downstream evaluation can tell
    /// "acting as platform admin" apart from "no access" without a separate
    /// flag check at every call site.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigurationError` only when the user record is missing
    /// required identity fields. That signals a data-integrity problem, not
    /// a business condition.
    pub fn issue(
        &self,
        user: &PlatformUser,
        memberships: Vec<MembershipClaim>,
        asserted_context: Option<&str>,
    ) -> Result<TokenPair, AuthError> {
        let (access_token, expires_in) = self.issue_access(user, memberships, asserted_context)?;

        Ok(TokenPair {
            access_token,
            refresh_token: generate_refresh_token(),
            expires_in,
        })
    }

    /// Issues an access token alone, without a paired refresh token.
    ///
    /// Used by the context refresh flow, which re-scopes an existing login
    /// rather than starting a new one.
    pub fn issue_access(
        &self,
        user: &PlatformUser,
        mut memberships: Vec<MembershipClaim>,
        asserted_context: Option<&str>,
    ) -> Result<(String, i64), AuthError> {
        if user.email.is_empty() {
            return Err(AuthError::ConfigurationError(format!(
                "user {} has no email on record",
                user.id
            )));
        }

        if user.is_global_admin
            && asserted_context.is_none()
            && !memberships
                .iter()
                .any(|m| m.role == ClaimRole::PlatformAdmin)
        {
            memberships.push(MembershipClaim::platform_admin());
        }

        let now = Utc::now();
        let exp = now + self.config.access_expiry;
        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
            is_global_admin: if user.is_global_admin {
                "true".to_owned()
            } else {
                "false".to_owned()
            },
            memberships: encode_memberships(&memberships),
            jti: generate_token(JTI_LENGTH),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let access_token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenInvalid)?;

        Ok((access_token, self.config.access_expiry.num_seconds()))
    }

    /// Decodes and validates an access token, returning the claims.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(ref iss) = self.config.issuer {
            validation.set_issuer(&[iss]);
        }

        if let Some(ref aud) = self.config.audience {
            validation.set_audience(&[aud]);
        } else {
            validation.validate_aud = false;
        }

        let token_data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        Ok(token_data.claims)
    }

    /// Returns the configured access token expiry duration.
    pub fn access_expiry(&self) -> chrono::Duration {
        self.config.access_expiry
    }
}
