//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::session::SessionUser;

use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub password: UserPassword,
    pub email: Option<Email>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Identity handed to downstream handlers for this request
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            user_id: self.user_id,
            user_name: self.user_name.to_string(),
        }
    }
}

/// User not yet persisted (id is assigned by the store)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub password: UserPassword,
    pub email: Option<Email>,
}
