use crate::jwt::TeamRole;

/// Declares what a protected operation requires of its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPolicy {
    /// Requires the platform-admin flag in the caller's claims.
    PlatformAdmin,
    /// Requires a membership in the request's resolved team.
    Team(TeamPolicy),
}

impl AccessPolicy {
    /// Team access at the default minimum role (`Member`).
    pub fn team() -> Self {
        Self::Team(TeamPolicy::default())
    }

    /// Team access at a specific minimum role.
    pub fn team_with_role(minimum_role: TeamRole) -> Self {
        Self::Team(TeamPolicy {
            minimum_role,
            ..Default::default()
        })
    }
}

/// Parameters for team-scoped access.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPolicy {
    /// Lowest role allowed to perform the operation.
    pub minimum_role: TeamRole,
    /// When true, a team id supplied by the route must agree with the
    /// caller's matched membership. Defends against addressing team B's
    /// resource by id while holding a token for team A.
    pub enforce_route_team: bool,
}

impl Default for TeamPolicy {
    fn default() -> Self {
        Self {
            minimum_role: TeamRole::Member,
            enforce_route_team: true,
        }
    }
}
