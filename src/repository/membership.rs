use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jwt::{ClaimRole, MemberType, MembershipClaim, TeamRole};
use crate::AuthError;

/// Links a user to a team with a role and a business label.
///
/// Invariant: at most one membership per `(user_id, team_id)`. The record is
/// a many-to-many association with its own lifecycle, created on
/// registration or invite acceptance and removed on revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: i64,
    pub user_id: i64,
    pub team_id: i64,
    pub team_subdomain: String,
    /// Stored as a string; parsed via [`TeamRole::from_str`], which also
    /// accepts the legacy numeric encoding.
    pub role: String,
    /// Business label only; carries no access-control weight.
    pub member_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMembership {
    /// Parse the stored role string.
    pub fn parse_role(&self) -> Option<TeamRole> {
        TeamRole::from_str(&self.role)
    }

    /// Parse the stored member type string.
    pub fn parse_member_type(&self) -> Option<MemberType> {
        MemberType::from_str(&self.member_type)
    }

    /// Converts this row into its token claim form.
    ///
    /// Rows with unrecognized roles yield `None` and are left out of the
    /// token; a membership that cannot be ranked grants nothing.
    pub fn to_claim(&self) -> Option<MembershipClaim> {
        let role = self.parse_role()?;
        Some(MembershipClaim {
            team_id: self.team_id,
            team_subdomain: if self.team_subdomain.is_empty() {
                None
            } else {
                Some(self.team_subdomain.clone())
            },
            role: ClaimRole::Team(role),
            member_type: self.parse_member_type(),
        })
    }
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<TeamMembership>, AuthError>;
    async fn find_by_team_and_user(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMembership>, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str, member_type: &str, subdomain: &str) -> TeamMembership {
        let now = Utc::now();
        TeamMembership {
            id: 1,
            user_id: 1,
            team_id: 5,
            team_subdomain: subdomain.to_owned(),
            role: role.to_owned(),
            member_type: member_type.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_claim() {
        let claim = row("owner", "coach", "eagles").to_claim().unwrap();
        assert_eq!(claim.team_id, 5);
        assert_eq!(claim.role, ClaimRole::Team(TeamRole::Owner));
        assert_eq!(claim.member_type, Some(MemberType::Coach));
        assert_eq!(claim.team_subdomain.as_deref(), Some("eagles"));
    }

    #[test]
    fn test_to_claim_legacy_numeric_role() {
        let claim = row("1", "athlete", "eagles").to_claim().unwrap();
        assert_eq!(claim.role, ClaimRole::Team(TeamRole::Owner));
    }

    #[test]
    fn test_to_claim_missing_subdomain() {
        let claim = row("member", "athlete", "").to_claim().unwrap();
        assert_eq!(claim.team_subdomain, None);
    }

    #[test]
    fn test_unrecognized_role_yields_none() {
        assert!(row("superuser", "coach", "eagles").to_claim().is_none());
    }
}
