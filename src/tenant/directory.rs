use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// A team as seen by the tenant resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier.
    pub id: i64,
    /// Human-readable team name.
    pub name: String,
    /// URL-friendly unique subdomain label.
    pub subdomain: String,
}

/// Lookup of teams by subdomain.
///
/// Implement this over your team store. The resolver only ever reads.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Team>, AuthError>;
}

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory team directory for tests.
    #[derive(Clone, Default)]
    pub struct MockTeamDirectory {
        teams: Arc<Mutex<Vec<Team>>>,
        lookups: Arc<AtomicUsize>,
    }

    impl MockTeamDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_team(self, id: i64, name: &str, subdomain: &str) -> Self {
            self.teams.lock().unwrap().push(Team {
                id,
                name: name.to_owned(),
                subdomain: subdomain.to_owned(),
            });
            self
        }

        /// Number of lookups served, for cache assertions.
        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TeamDirectory for MockTeamDirectory {
        async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Team>, AuthError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let teams = self.teams.lock().unwrap();
            Ok(teams
                .iter()
                .find(|t| t.subdomain.eq_ignore_ascii_case(subdomain))
                .cloned())
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockTeamDirectory;
