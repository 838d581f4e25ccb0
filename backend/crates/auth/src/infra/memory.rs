//! In-Memory Repository
//!
//! `UserRepository` over a mutex-guarded vector. Used by tests and local
//! runs without a database.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
}

/// In-memory user repository; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AuthError::Internal("user store lock poisoned".to_string()))
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.users.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }

        inner.next_id += 1;
        let created = User {
            user_id: UserId::from_i64(inner.next_id),
            user_name: user.user_name,
            password: user.password,
            email: user.email,
            created_at: Utc::now(),
        };
        inner.users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.lock()?.users.iter().any(|u| &u.user_name == user_name))
    }
}
