#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use super::repository::SessionRepository;
use super::DeviceSession;
use crate::AuthError;

/// In-memory session store for tests and downstream mocking.
///
/// Production setups implement [`SessionRepository`] over their relational
/// store.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<Vec<DeviceSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all sessions, for assertions.
    pub fn all(&self) -> Vec<DeviceSession> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(
        &self,
        user_id: i64,
        fingerprint: &str,
    ) -> Result<DeviceSession, AuthError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().unwrap();
        let session = DeviceSession {
            id: sessions.len() as i64 + 1,
            user_id,
            fingerprint: fingerprint.to_owned(),
            created_on: now,
            last_active_on: now,
            is_active: true,
        };
        sessions.push(session.clone());
        drop(sessions);

        Ok(session)
    }

    async fn find_active_by_user(&self, user_id: i64) -> Result<Option<DeviceSession>, AuthError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active)
            .max_by_key(|s| s.created_on)
            .cloned())
    }

    async fn touch_session(&self, session_id: i64) -> Result<(), AuthError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.last_active_on = Utc::now();
                Ok(())
            }
            None => Err(AuthError::SessionNotFound),
        }
    }

    async fn deactivate_session(&self, session_id: i64) -> Result<(), AuthError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.is_active = false;
                Ok(())
            }
            None => Err(AuthError::SessionNotFound),
        }
    }

    async fn deactivate_all_for_user(&self, user_id: i64) -> Result<(), AuthError> {
        let mut sessions = self.sessions.lock().unwrap();
        for session in sessions.iter_mut().filter(|s| s.user_id == user_id) {
            session.is_active = false;
        }
        Ok(())
    }
}
