//! HTTP handlers for the session security endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::error::AppError;
use super::middleware::{client_ip, CurrentClaims};
use super::routes::AppState;
use super::types::{
    ContextResponse, HeartbeatRequest, MessageResponse, RefreshContextRequest,
    RefreshTokenRequest, TokenResponse,
};
use crate::access::{evaluate_audited, AccessPolicy};
use crate::actions::{ForceLogoutAction, HeartbeatAction, RefreshContextAction, RotateTokenAction};
use crate::repository::{MembershipRepository, RefreshTokenRepository, UserRepository};
use crate::session::{Fingerprint, SessionRepository};
use crate::tenant::{TeamDirectory, TenantContext};
use crate::AuthError;

/// Prove the session is alive and still bound to the same device.
///
/// POST /heartbeat
pub async fn heartbeat<U, S, M, R, D>(
    State(state): State<AppState<U, S, M, R, D>>,
    claims: CurrentClaims,
    Json(body): Json<HeartbeatRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    let fingerprint = Fingerprint::derive(
        &body.fingerprint,
        state.config.session.max_fingerprint_length,
    );
    let action = HeartbeatAction::new(state.user_repo, state.session_repo, state.refresh_repo);

    action.execute(claims.claims(), &fingerprint).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "ok".to_owned(),
        }),
    ))
}

/// Invalidate every token and session a user holds. Platform admins only.
///
/// POST /force-logout/{user_id}
pub async fn force_logout<U, S, M, R, D>(
    State(state): State<AppState<U, S, M, R, D>>,
    claims: CurrentClaims,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    evaluate_audited(
        &AccessPolicy::PlatformAdmin,
        Some(claims.claims()),
        &TenantContext::PlatformAdmin,
        None,
    )
    .await
    .map_err(AuthError::from)?;

    let action = ForceLogoutAction::new(state.user_repo, state.session_repo, state.refresh_repo);
    action.execute(user_id).await?;

    Ok(StatusCode::OK)
}

/// Exchange a refresh token for a fresh pair.
///
/// POST /refresh-token
pub async fn refresh_token<U, S, M, R, D>(
    State(state): State<AppState<U, S, M, R, D>>,
    headers: HeaderMap,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    let action = RotateTokenAction::new(
        state.user_repo,
        state.membership_repo,
        state.refresh_repo,
        state.issuer,
        state.config.tokens,
    );

    let pair = action
        .execute(&body.refresh_token, &client_ip(&headers))
        .await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }),
    ))
}

/// Re-scope the caller's access token to another tenant.
///
/// POST /refresh-context
pub async fn refresh_context<U, S, M, R, D>(
    State(state): State<AppState<U, S, M, R, D>>,
    claims: CurrentClaims,
    Json(body): Json<RefreshContextRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    let action = RefreshContextAction::new(
        state.user_repo,
        state.membership_repo,
        state.resolver,
        state.issuer,
    );

    let output = action.execute(claims.claims(), &body.subdomain).await?;

    Ok((
        StatusCode::OK,
        Json(ContextResponse {
            access_token: output.access_token,
            expires_in: output.expires_in,
        }),
    ))
}
