use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use super::handlers;
use crate::config::TeamgateConfig;
use crate::jwt::TokenIssuer;
use crate::repository::{MembershipRepository, RefreshTokenRepository, UserRepository};
use crate::session::SessionRepository;
use crate::tenant::{TeamDirectory, TenantResolver};

/// Shared state for the security endpoints.
pub struct AppState<U, S, M, R, D: TeamDirectory> {
    pub user_repo: U,
    pub session_repo: S,
    pub membership_repo: M,
    pub refresh_repo: R,
    pub resolver: Arc<TenantResolver<D>>,
    pub issuer: TokenIssuer,
    pub config: TeamgateConfig,
}

impl<U, S, M, R, D> Clone for AppState<U, S, M, R, D>
where
    U: Clone,
    S: Clone,
    M: Clone,
    R: Clone,
    D: TeamDirectory,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: self.user_repo.clone(),
            session_repo: self.session_repo.clone(),
            membership_repo: self.membership_repo.clone(),
            refresh_repo: self.refresh_repo.clone(),
            resolver: Arc::clone(&self.resolver),
            issuer: self.issuer.clone(),
            config: self.config.clone(),
        }
    }
}

/// Routes for heartbeat, token rotation, context refresh, and the
/// administrative force-logout.
pub fn security_routes<U, S, M, R, D>() -> Router<AppState<U, S, M, R, D>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    M: MembershipRepository + Clone + Send + Sync + 'static,
    R: RefreshTokenRepository + Clone + Send + Sync + 'static,
    D: TeamDirectory + 'static,
{
    Router::new()
        .route("/heartbeat", post(handlers::heartbeat::<U, S, M, R, D>))
        .route(
            "/force-logout/{user_id}",
            post(handlers::force_logout::<U, S, M, R, D>),
        )
        .route(
            "/refresh-token",
            post(handlers::refresh_token::<U, S, M, R, D>),
        )
        .route(
            "/refresh-context",
            post(handlers::refresh_context::<U, S, M, R, D>),
        )
}
