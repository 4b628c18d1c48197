#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use super::membership::{MembershipRepository, TeamMembership};
use crate::jwt::{MemberType, TeamRole};
use crate::AuthError;

#[derive(Clone, Default)]
pub struct MockMembershipRepository {
    pub memberships: Arc<Mutex<Vec<TeamMembership>>>,
}

impl MockMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_membership(
        self,
        user_id: i64,
        team_id: i64,
        subdomain: &str,
        role: TeamRole,
        member_type: MemberType,
    ) -> Self {
        let now = Utc::now();
        let mut memberships = self.memberships.lock().unwrap();
        let id = memberships.len() as i64 + 1;
        memberships.push(TeamMembership {
            id,
            user_id,
            team_id,
            team_subdomain: subdomain.to_owned(),
            role: role.as_str().to_owned(),
            member_type: member_type.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        });
        drop(memberships);
        self
    }

    /// Replaces a user's role in a team, for rotation tests.
    pub fn set_role(&self, user_id: i64, team_id: i64, role: TeamRole) {
        let mut memberships = self.memberships.lock().unwrap();
        if let Some(m) = memberships
            .iter_mut()
            .find(|m| m.user_id == user_id && m.team_id == team_id)
        {
            m.role = role.as_str().to_owned();
            m.updated_at = Utc::now();
        }
    }

    pub fn remove(&self, user_id: i64, team_id: i64) {
        let mut memberships = self.memberships.lock().unwrap();
        memberships.retain(|m| !(m.user_id == user_id && m.team_id == team_id));
    }
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<TeamMembership>, AuthError> {
        let memberships = self.memberships.lock().unwrap();
        Ok(memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_team_and_user(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMembership>, AuthError> {
        let memberships = self.memberships.lock().unwrap();
        Ok(memberships
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }
}
