use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ErrorResponse;
use crate::AuthError;

/// Converts `AuthError` into appropriate HTTP responses.
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse::from(self.0.clone());
        let status = match &self.0 {
            AuthError::Unauthenticated
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::FingerprintMismatch
            | AuthError::ForcedLogout
            | AuthError::UserNotFound
            | AuthError::SessionNotFound => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole
            | AuthError::NotAMember
            | AuthError::TeamMismatch
            | AuthError::NotGlobalAdmin => StatusCode::FORBIDDEN,
            AuthError::TenantNotFound => StatusCode::NOT_FOUND,
            AuthError::DatabaseError(_) | AuthError::ConfigurationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = AppError(AuthError::FingerprintMismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError(AuthError::NotAMember).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError(AuthError::TenantNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError(AuthError::DatabaseError("down".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
