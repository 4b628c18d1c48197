//! Tenant-aware identity and session security for multi-tenant team platforms.
//!
//! `teamgate` covers the security core of a team-management SaaS: issuing
//! access tokens that carry a user's memberships across many teams, resolving
//! the "current tenant" from a request's subdomain, enforcing a role-hierarchy
//! access policy with a platform-admin bypass, and keeping device sessions
//! alive (and revocable) through fingerprint-bound heartbeats.
//!
//! Business CRUD, UI, and delivery of emails/SMS are collaborators, not part
//! of this crate. Services obtain the resolved `(team_id, role, member_type)`
//! for a request from [`access::evaluate`] and must not re-implement checks.

pub mod access;
pub mod actions;
pub mod config;
pub mod crypto;
pub mod events;
pub mod jwt;
pub mod liveness;
pub mod repository;
pub mod session;
pub mod tenant;

#[cfg(feature = "axum")]
pub mod api;

pub use config::TeamgateConfig;
pub use crypto::SecretString;
pub use events::register_event_listeners;
pub use jwt::{AccessClaims, ClaimRole, MemberType, MembershipClaim, TeamRole, TokenIssuer};
pub use liveness::{Clock, LivenessController, LivenessState, LogoutReason};
pub use repository::{
    MembershipRepository, PlatformUser, RefreshToken, RefreshTokenRepository, TeamMembership,
    UserRepository,
};
pub use session::{DeviceSession, Fingerprint, SessionRepository};
pub use tenant::{TeamDirectory, TenantContext, TenantResolver};

#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockMembershipRepository, MockRefreshTokenRepository, MockUserRepository};
#[cfg(any(test, feature = "mocks"))]
pub use session::InMemorySessionRepository;
#[cfg(any(test, feature = "mocks"))]
pub use tenant::MockTeamDirectory;

use std::fmt;

/// Errors produced by the identity and session security core.
///
/// Authorization denials carry a typed reason for audit logging, but the
/// HTTP layer collapses them to coarse 401/403 responses so clients cannot
/// probe team membership.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No token, or a token that failed signature validation.
    Unauthenticated,
    /// Token is past its expiry.
    TokenExpired,
    /// Token is malformed or otherwise unusable.
    TokenInvalid,
    /// Caller's role is below the operation's minimum role.
    InsufficientRole,
    /// Caller holds no membership in the resolved team.
    NotAMember,
    /// Route-addressed team disagrees with the caller's matched membership.
    TeamMismatch,
    /// Operation requires the platform-admin flag.
    NotGlobalAdmin,
    /// Hostname did not resolve to a known tenant.
    TenantNotFound,
    /// Presented fingerprint differs from the session's bound fingerprint.
    /// Terminates the session; never retryable.
    FingerprintMismatch,
    /// An administrator invalidated this user's sessions.
    ForcedLogout,
    UserNotFound,
    SessionNotFound,
    DatabaseError(String),
    ConfigurationError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Authentication required"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenInvalid => write!(f, "Invalid token"),
            AuthError::InsufficientRole => write!(f, "Insufficient role for this operation"),
            AuthError::NotAMember => write!(f, "Not a member of this team"),
            AuthError::TeamMismatch => write!(f, "Team does not match membership"),
            AuthError::NotGlobalAdmin => write!(f, "Platform administrator access required"),
            AuthError::TenantNotFound => write!(f, "Tenant not found"),
            AuthError::FingerprintMismatch => write!(f, "Session ended for security reasons"),
            AuthError::ForcedLogout => write!(f, "Session ended by an administrator"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::SessionNotFound => write!(f, "Session not found"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}
