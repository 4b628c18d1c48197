//! Repository traits and entities backing the security core.
//!
//! Only what session security needs is persisted here; domain entities
//! (rosters, schedules, payments) live with their own services.

mod membership;
mod refresh_token;
mod user;

pub use membership::{MembershipRepository, TeamMembership};
pub use refresh_token::{RefreshToken, RefreshTokenRepository, RevokeReason, StoreRefreshToken};
pub use user::{PlatformUser, UserRepository};

#[cfg(any(test, feature = "mocks"))]
mod membership_mock;
#[cfg(any(test, feature = "mocks"))]
mod refresh_token_mock;
#[cfg(any(test, feature = "mocks"))]
mod user_mock;

#[cfg(any(test, feature = "mocks"))]
pub use membership_mock::MockMembershipRepository;
#[cfg(any(test, feature = "mocks"))]
pub use refresh_token_mock::MockRefreshTokenRepository;
#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
