#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use super::user::{PlatformUser, UserRepository};
use crate::AuthError;

#[derive(Clone, Default)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<PlatformUser>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: PlatformUser) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<PlatformUser>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn touch_last_activity(&self, user_id: i64) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.last_activity_on = Utc::now();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_force_logout_after(
        &self,
        user_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.force_logout_after = Some(cutoff);
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AuthError::UserNotFound),
        }
    }

    async fn soft_delete_user(&self, user_id: i64) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AuthError::UserNotFound),
        }
    }
}
