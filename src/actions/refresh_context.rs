use std::sync::Arc;

use chrono::Utc;

use crate::events::{dispatch, SecurityEvent};
use crate::jwt::{AccessClaims, TokenIssuer};
use crate::repository::{MembershipRepository, UserRepository};
use crate::tenant::{TeamDirectory, TenantContext, TenantResolver};
use crate::AuthError;

/// A re-scoped access token for one tenant.
#[derive(Debug, Clone)]
pub struct RefreshContextOutput {
    pub access_token: String,
    pub expires_in: i64,
}

/// Re-scopes an authenticated user's access token to a named tenant.
///
/// Fired when the client hops subdomains (eagles.example.com to
/// hawks.example.com) without logging in again. Membership in the target
/// team is verified against the database, not against the old token, so a
/// removed member cannot hop into a team they just lost.
pub struct RefreshContextAction<U, M, D: TeamDirectory> {
    user_repo: U,
    membership_repo: M,
    resolver: Arc<TenantResolver<D>>,
    issuer: TokenIssuer,
}

impl<U, M, D> RefreshContextAction<U, M, D>
where
    U: UserRepository,
    M: MembershipRepository,
    D: TeamDirectory,
{
    pub fn new(
        user_repo: U,
        membership_repo: M,
        resolver: Arc<TenantResolver<D>>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            user_repo,
            membership_repo,
            resolver,
            issuer,
        }
    }

    #[tracing::instrument(name = "refresh_context", skip_all, fields(subdomain = subdomain), err)]
    pub async fn execute(
        &self,
        claims: &AccessClaims,
        subdomain: &str,
    ) -> Result<RefreshContextOutput, AuthError> {
        let user_id = claims.user_id()?;

        match self.resolver.resolve_label(subdomain).await? {
            TenantContext::Marketing => return Err(AuthError::TenantNotFound),
            TenantContext::PlatformAdmin => {
                if !claims.is_global_admin() {
                    return Err(AuthError::NotGlobalAdmin);
                }
            }
            TenantContext::Team(team) => {
                if !claims.is_global_admin() {
                    self.membership_repo
                        .find_by_team_and_user(team.id, user_id)
                        .await?
                        .ok_or(AuthError::NotAMember)?;
                }
            }
        }

        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active() {
            return Err(AuthError::UserNotFound);
        }

        let memberships = self.membership_repo.find_by_user(user_id).await?;
        let claims_out = memberships.iter().filter_map(|m| m.to_claim()).collect();

        let (access_token, expires_in) =
            self.issuer
                .issue_access(&user, claims_out, Some(subdomain))?;

        dispatch(SecurityEvent::ContextRefreshed {
            user_id,
            subdomain: subdomain.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(RefreshContextOutput {
            access_token,
            expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::jwt::{JwtConfig, MemberType, TeamRole};
    use crate::repository::{MockMembershipRepository, MockUserRepository, PlatformUser};
    use crate::tenant::MockTeamDirectory;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(JwtConfig::new("test-secret-32-bytes-long-key-01").unwrap())
    }

    fn claims_for(user: &PlatformUser) -> AccessClaims {
        let issuer = issuer();
        let pair = issuer.issue(user, vec![], None).unwrap();
        issuer.decode(&pair.access_token).unwrap()
    }

    fn action(
        users: MockUserRepository,
        memberships: MockMembershipRepository,
        directory: MockTeamDirectory,
    ) -> RefreshContextAction<MockUserRepository, MockMembershipRepository, MockTeamDirectory> {
        RefreshContextAction::new(
            users,
            memberships,
            Arc::new(TenantResolver::new(directory, ResolverConfig::default())),
            issuer(),
        )
    }

    #[tokio::test]
    async fn test_member_can_switch_into_their_team() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new().with_membership(
                1,
                5,
                "eagles",
                TeamRole::Member,
                MemberType::Athlete,
            ),
            MockTeamDirectory::new().with_team(5, "Eagles", "eagles"),
        );

        let output = action.execute(&claims, "eagles").await.unwrap();

        let new_claims = action.issuer.decode(&output.access_token).unwrap();
        assert_eq!(new_claims.user_id().unwrap(), 1);
        assert_eq!(new_claims.memberships().len(), 1);
    }

    #[tokio::test]
    async fn test_non_member_cannot_switch() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new(),
            MockTeamDirectory::new().with_team(5, "Eagles", "eagles"),
        );

        let result = action.execute(&claims, "eagles").await;
        assert_eq!(result.unwrap_err(), AuthError::NotAMember);
    }

    #[tokio::test]
    async fn test_global_admin_can_switch_anywhere() {
        let mut user = PlatformUser::mock(1);
        user.is_global_admin = true;
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new(),
            MockTeamDirectory::new().with_team(5, "Eagles", "eagles"),
        );

        assert!(action.execute(&claims, "eagles").await.is_ok());
        assert!(action.execute(&claims, "admin").await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_context_requires_global_admin() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new(),
            MockTeamDirectory::new(),
        );

        let result = action.execute(&claims, "admin").await;
        assert_eq!(result.unwrap_err(), AuthError::NotGlobalAdmin);
    }

    #[tokio::test]
    async fn test_unknown_subdomain() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new(),
            MockTeamDirectory::new(),
        );

        let result = action.execute(&claims, "ghosts").await;
        assert_eq!(result.unwrap_err(), AuthError::TenantNotFound);
    }

    #[tokio::test]
    async fn test_marketing_label_is_not_a_tenant() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let action = action(
            MockUserRepository::new().with_user(user),
            MockMembershipRepository::new(),
            MockTeamDirectory::new(),
        );

        let result = action.execute(&claims, "www").await;
        assert_eq!(result.unwrap_err(), AuthError::TenantNotFound);
    }

    #[tokio::test]
    async fn test_removed_member_cannot_hop_back() {
        let user = PlatformUser::mock(1);
        let claims = claims_for(&user);
        let memberships = MockMembershipRepository::new().with_membership(
            1,
            5,
            "eagles",
            TeamRole::Owner,
            MemberType::Coach,
        );
        let action = action(
            MockUserRepository::new().with_user(user),
            memberships,
            MockTeamDirectory::new().with_team(5, "Eagles", "eagles"),
        );

        action.membership_repo.remove(1, 5);
        let result = action.execute(&claims, "eagles").await;
        assert_eq!(result.unwrap_err(), AuthError::NotAMember);
    }
}
