use std::fmt;

use chrono::Utc;

use super::policy::{AccessPolicy, TeamPolicy};
use crate::events::{dispatch, SecurityEvent};
use crate::jwt::{AccessClaims, MemberType, TeamRole};
use crate::tenant::TenantContext;
use crate::AuthError;

/// A successful authorization outcome.
///
/// Business services consume the `(team_id, role, member_type)` tuple from
/// here and must not re-implement access checks themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessGrant {
    /// The team the grant applies to, when team-scoped.
    pub team_id: Option<i64>,
    /// The caller's role in that team. `None` when access came through the
    /// global-admin bypass.
    pub role: Option<TeamRole>,
    /// Business label of the matched membership.
    pub member_type: Option<MemberType>,
    /// True when the global-admin bypass granted access. Kept for audit.
    pub via_global_admin: bool,
}

/// Why an authorization check denied the caller.
///
/// The reason is for audit logging only; clients receive coarse 401/403
/// responses so they cannot probe membership.
#[derive(Debug, Clone, PartialEq)]
pub enum DenyReason {
    Unauthenticated,
    NotGlobalAdmin,
    NotAMember,
    TeamMismatch,
    InsufficientRole {
        required: TeamRole,
        actual: TeamRole,
    },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::NotGlobalAdmin => write!(f, "not a platform admin"),
            Self::NotAMember => write!(f, "not a member of this team"),
            Self::TeamMismatch => write!(f, "team mismatch"),
            Self::InsufficientRole { required, actual } => write!(
                f,
                "insufficient role: {} required, have {}",
                required.as_str(),
                actual.as_str()
            ),
        }
    }
}

/// A terminal denial with its typed reason.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDenied {
    pub reason: DenyReason,
}

impl From<AccessDenied> for AuthError {
    fn from(denied: AccessDenied) -> Self {
        match denied.reason {
            DenyReason::Unauthenticated => AuthError::Unauthenticated,
            DenyReason::NotGlobalAdmin => AuthError::NotGlobalAdmin,
            DenyReason::NotAMember => AuthError::NotAMember,
            DenyReason::TeamMismatch => AuthError::TeamMismatch,
            DenyReason::InsufficientRole { .. } => AuthError::InsufficientRole,
        }
    }
}

/// Evaluates a policy against a caller's claims and the resolved tenant.
///
/// `route_team_id` is the team id taken from a route parameter, when the
/// operation addresses a team resource by id.
pub fn evaluate(
    policy: &AccessPolicy,
    claims: Option<&AccessClaims>,
    tenant: &TenantContext,
    route_team_id: Option<i64>,
) -> Result<AccessGrant, AccessDenied> {
    let claims = match claims {
        Some(claims) => claims,
        None => return Err(deny(DenyReason::Unauthenticated, None)),
    };

    match policy {
        AccessPolicy::PlatformAdmin => {
            if claims.is_global_admin() {
                Ok(AccessGrant {
                    team_id: None,
                    role: None,
                    member_type: None,
                    via_global_admin: true,
                })
            } else {
                Err(deny(DenyReason::NotGlobalAdmin, claims.user_id().ok()))
            }
        }
        AccessPolicy::Team(team_policy) => {
            evaluate_team(team_policy, claims, tenant, route_team_id)
        }
    }
}

/// Evaluates a policy and dispatches an `access.denied` audit event on
/// denial.
///
/// Same result as [`evaluate`]; use this form wherever an async context is
/// available so denials reach the registered event listeners, not just the
/// tracing log.
pub async fn evaluate_audited(
    policy: &AccessPolicy,
    claims: Option<&AccessClaims>,
    tenant: &TenantContext,
    route_team_id: Option<i64>,
) -> Result<AccessGrant, AccessDenied> {
    let result = evaluate(policy, claims, tenant, route_team_id);
    if let Err(denied) = &result {
        dispatch(SecurityEvent::AccessDenied {
            user_id: claims.and_then(|c| c.user_id().ok()),
            reason: denied.reason.to_string(),
            at: Utc::now(),
        })
        .await;
    }
    result
}

fn evaluate_team(
    policy: &TeamPolicy,
    claims: &AccessClaims,
    tenant: &TenantContext,
    route_team_id: Option<i64>,
) -> Result<AccessGrant, AccessDenied> {
    let user_id = claims.user_id().ok();

    // Intentional, audited escape hatch: platform admins act on any team.
    if claims.is_global_admin() {
        return Ok(AccessGrant {
            team_id: tenant.team().map(|t| t.id).or(route_team_id),
            role: None,
            member_type: None,
            via_global_admin: true,
        });
    }

    let team = match tenant.team() {
        Some(team) => team,
        None => return Err(deny(DenyReason::NotAMember, user_id)),
    };

    let memberships = claims.memberships();
    let matched = memberships
        .iter()
        .find(|m| m.role.team_role().is_some() && m.matches_team(team.id, &team.subdomain));

    let matched = match matched {
        Some(m) => m,
        None => return Err(deny(DenyReason::NotAMember, user_id)),
    };

    if policy.enforce_route_team {
        if let Some(route_id) = route_team_id {
            if route_id != matched.team_id {
                return Err(deny(DenyReason::TeamMismatch, user_id));
            }
        }
    }

    // The filter above guarantees a concrete team role here.
    let role = match matched.role.team_role() {
        Some(role) => role,
        None => return Err(deny(DenyReason::NotAMember, user_id)),
    };

    if !role.satisfies(policy.minimum_role) {
        return Err(deny(
            DenyReason::InsufficientRole {
                required: policy.minimum_role,
                actual: role,
            },
            user_id,
        ));
    }

    Ok(AccessGrant {
        team_id: Some(matched.team_id),
        role: Some(role),
        member_type: matched.member_type,
        via_global_admin: false,
    })
}

fn deny(reason: DenyReason, user_id: Option<i64>) -> AccessDenied {
    tracing::warn!(
        target: "teamgate::access",
        reason = %reason,
        user_id = user_id,
        "access denied"
    );
    AccessDenied { reason }
}
