use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::error::AppError;
use super::routes::AppState;
use crate::jwt::AccessClaims;
use crate::repository::{MembershipRepository, RefreshTokenRepository, UserRepository};
use crate::session::SessionRepository;
use crate::tenant::TeamDirectory;
use crate::AuthError;

/// Validates the bearer token from the `Authorization` header and yields
/// the decoded claims. Stateless: verification is signature plus expiry,
/// no repository round-trip.
#[derive(Debug, Clone)]
pub struct CurrentClaims(AccessClaims);

impl CurrentClaims {
    pub fn into_inner(self) -> AccessClaims {
        self.0
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.0
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Best-effort client address for the refresh-token audit trail.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_owned()
}

impl<U, S, M, R, D> FromRequestParts<AppState<U, S, M, R, D>> for CurrentClaims
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, S, M, R, D>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or(AppError(AuthError::Unauthenticated))?;

        let claims = state.issuer.decode(&token).map_err(AppError)?;

        Ok(CurrentClaims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc123"));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_bearer_token(&headers), None);

        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_client_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.9");

        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
