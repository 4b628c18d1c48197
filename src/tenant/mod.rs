//! Hostname-to-tenant resolution.
//!
//! Every team gets its own subdomain; two labels are reserved for the public
//! marketing site and the platform-admin console. Resolution is deterministic
//! and side-effect-free apart from cache population.

mod directory;
mod resolver;

pub use directory::{Team, TeamDirectory};
pub use resolver::TenantResolver;

#[cfg(any(test, feature = "mocks"))]
pub use directory::MockTeamDirectory;

/// The tenant a request is addressed to, as derived from its hostname.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantContext {
    /// Public, unauthenticated marketing site. No team.
    Marketing,
    /// Platform-admin console. Requires the global-admin flag.
    PlatformAdmin,
    /// A specific team's slice of the platform.
    Team(Team),
}

impl TenantContext {
    /// Returns the resolved team, if this context addresses one.
    pub fn team(&self) -> Option<&Team> {
        match self {
            Self::Team(team) => Some(team),
            _ => None,
        }
    }

    /// Returns true for the platform-admin console context.
    pub fn is_platform_admin(&self) -> bool {
        matches!(self, Self::PlatformAdmin)
    }
}
