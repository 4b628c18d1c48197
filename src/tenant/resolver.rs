use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::directory::{Team, TeamDirectory};
use super::TenantContext;
use crate::config::ResolverConfig;
use crate::AuthError;

struct CacheEntry {
    team: Team,
    cached_at: DateTime<Utc>,
}

/// Maps an inbound hostname to a tenant.
///
/// Positive team lookups are cached for the configured TTL so a busy tenant
/// does not cost one directory query per request. Misses are not cached;
/// a newly created team becomes addressable immediately.
pub struct TenantResolver<D: TeamDirectory> {
    directory: D,
    config: ResolverConfig,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl<D: TeamDirectory> TenantResolver<D> {
    pub fn new(directory: D, config: ResolverConfig) -> Self {
        Self {
            directory,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a hostname to its tenant context.
    ///
    /// The leftmost label is the candidate subdomain; ports are stripped.
    /// Bare hosts and single-label hosts (e.g. `localhost`) resolve to the
    /// marketing context. An unknown subdomain yields `TenantNotFound`,
    /// which callers must surface as a plain not-found response rather than
    /// hinting whether a name was almost valid.
    pub async fn resolve(&self, hostname: &str) -> Result<TenantContext, AuthError> {
        match candidate_subdomain(hostname) {
            Some(label) => self.resolve_label(&label).await,
            None => Ok(TenantContext::Marketing),
        }
    }

    /// Resolves a bare subdomain label, bypassing hostname parsing.
    ///
    /// Used by the context refresh flow, which receives the label directly.
    pub async fn resolve_label(&self, label: &str) -> Result<TenantContext, AuthError> {
        let subdomain = label.to_ascii_lowercase();

        if subdomain == self.config.marketing_label {
            return Ok(TenantContext::Marketing);
        }
        if subdomain == self.config.admin_label {
            return Ok(TenantContext::PlatformAdmin);
        }

        if let Some(team) = self.cached(&subdomain) {
            return Ok(TenantContext::Team(team));
        }

        match self.directory.find_by_subdomain(&subdomain).await? {
            Some(team) => {
                self.store(&subdomain, team.clone());
                Ok(TenantContext::Team(team))
            }
            None => {
                tracing::debug!(subdomain = %subdomain, "tenant not found");
                Err(AuthError::TenantNotFound)
            }
        }
    }

    fn cached(&self, subdomain: &str) -> Option<Team> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(subdomain)?;
        if Utc::now() - entry.cached_at > self.config.cache_ttl {
            return None;
        }
        Some(entry.team.clone())
    }

    fn store(&self, subdomain: &str, team: Team) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                subdomain.to_owned(),
                CacheEntry {
                    team,
                    cached_at: Utc::now(),
                },
            );
        }
    }
}

/// Extracts the candidate subdomain label from a hostname, if it has one.
fn candidate_subdomain(hostname: &str) -> Option<String> {
    let host = hostname.split(':').next().unwrap_or(hostname);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    // `localhost` or `example.com` carry no subdomain.
    if labels.len() < 3 {
        return None;
    }

    Some(labels[0].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::MockTeamDirectory;

    fn resolver(directory: MockTeamDirectory) -> TenantResolver<MockTeamDirectory> {
        TenantResolver::new(directory, ResolverConfig::default())
    }

    #[test]
    fn test_candidate_subdomain_extraction() {
        assert_eq!(
            candidate_subdomain("eagles.example.com"),
            Some("eagles".to_owned())
        );
        assert_eq!(
            candidate_subdomain("Eagles.example.com:8080"),
            Some("eagles".to_owned())
        );
        assert_eq!(candidate_subdomain("example.com"), None);
        assert_eq!(candidate_subdomain("localhost"), None);
        assert_eq!(candidate_subdomain("localhost:3000"), None);
    }

    #[tokio::test]
    async fn test_resolves_known_team() {
        let directory = MockTeamDirectory::new().with_team(1, "Eagles", "eagles");
        let resolver = resolver(directory);

        let context = resolver.resolve("eagles.example.com").await.unwrap();
        let team = context.team().expect("should resolve to a team");
        assert_eq!(team.id, 1);
        assert_eq!(team.subdomain, "eagles");
    }

    #[tokio::test]
    async fn test_unknown_subdomain_is_not_found() {
        let directory = MockTeamDirectory::new().with_team(1, "Eagles", "eagles");
        let resolver = resolver(directory);

        let result = resolver.resolve("unknown.example.com").await;
        assert_eq!(result.unwrap_err(), AuthError::TenantNotFound);
    }

    #[tokio::test]
    async fn test_reserved_admin_label_wins_over_team_table() {
        // Even if someone registers a team called "admin", the reserved
        // label resolves to the administrative context.
        let directory = MockTeamDirectory::new().with_team(1, "Admins", "admin");
        let resolver = resolver(directory);

        let context = resolver.resolve("admin.example.com").await.unwrap();
        assert!(context.is_platform_admin());
        assert_eq!(resolver.directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_marketing_contexts() {
        let resolver = resolver(MockTeamDirectory::new());

        assert_eq!(
            resolver.resolve("www.example.com").await.unwrap(),
            TenantContext::Marketing
        );
        assert_eq!(
            resolver.resolve("example.com").await.unwrap(),
            TenantContext::Marketing
        );
        assert_eq!(
            resolver.resolve("localhost:8080").await.unwrap(),
            TenantContext::Marketing
        );
    }

    #[tokio::test]
    async fn test_positive_lookup_is_cached() {
        let directory = MockTeamDirectory::new().with_team(1, "Eagles", "eagles");
        let resolver = resolver(directory);

        resolver.resolve("eagles.example.com").await.unwrap();
        resolver.resolve("eagles.example.com").await.unwrap();
        resolver.resolve("eagles.example.com:443").await.unwrap();

        assert_eq!(resolver.directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_miss_is_not_cached() {
        let directory = MockTeamDirectory::new();
        let resolver = resolver(directory);

        let _ = resolver.resolve("eagles.example.com").await;
        let _ = resolver.resolve("eagles.example.com").await;

        // Both misses hit the directory; a team created between requests
        // becomes addressable without waiting out a negative-cache TTL.
        assert_eq!(resolver.directory.lookup_count(), 2);
    }
}
