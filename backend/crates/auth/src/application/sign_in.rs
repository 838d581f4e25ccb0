//! Sign In Use Case
//!
//! Checks a user name and password pair. Establishing the session is left to
//! the caller.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Every failure (malformed name, unknown user, wrong password) is
    /// reported as `InvalidCredentials`.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<User> {
        let user_name =
            UserName::new(input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let attempt = RawPassword::attempt(input.password);
        if !user.password.verify(&user_name, &attempt) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(user)
    }
}
