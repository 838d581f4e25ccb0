//! Sign Up Use Case
//!
//! Validates the signup form, creates the user, and reports every invalid
//! field at once.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub const INVALID_USERNAME: &str = "Invalid Username";
pub const USER_EXISTS: &str = "User already exists.";
pub const INVALID_PASSWORD: &str = "Invalid Password";
pub const PASSWORDS_MISMATCH: &str = "Passwords Mismatch";
pub const INVALID_EMAIL: &str = "Invalid email";

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub password: String,
    pub verify: String,
    /// Empty or absent means no email
    pub email: Option<String>,
}

/// Per-field error markers for the signup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignUpErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_username: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_password: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_verify: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_email: Option<&'static str>,
}

impl SignUpErrors {
    pub fn is_empty(&self) -> bool {
        self.error_username.is_none()
            && self.error_password.is_none()
            && self.error_verify.is_none()
            && self.error_email.is_none()
    }
}

#[derive(Debug)]
pub enum SignUpOutcome {
    Created(User),
    Rejected(SignUpErrors),
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutcome> {
        let mut errors = SignUpErrors::default();

        let user_name = match UserName::new(input.user_name) {
            Ok(name) => {
                if self.repo.exists_by_user_name(&name).await? {
                    errors.error_username = Some(USER_EXISTS);
                    None
                } else {
                    Some(name)
                }
            }
            Err(_) => {
                errors.error_username = Some(INVALID_USERNAME);
                None
            }
        };

        // The confirmation is only compared once the password itself is valid
        let password = match RawPassword::new(input.password.clone()) {
            Ok(raw) if input.verify == input.password => Some(raw),
            Ok(_) => {
                errors.error_verify = Some(PASSWORDS_MISMATCH);
                None
            }
            Err(_) => {
                errors.error_password = Some(INVALID_PASSWORD);
                None
            }
        };

        let email = match input.email.filter(|e| !e.is_empty()).map(Email::new) {
            None => None,
            Some(Ok(email)) => Some(email),
            Some(Err(_)) => {
                errors.error_email = Some(INVALID_EMAIL);
                None
            }
        };

        let (Some(user_name), Some(password), true) = (user_name, password, errors.is_empty())
        else {
            tracing::debug!(?errors, "Signup rejected");
            return Ok(SignUpOutcome::Rejected(errors));
        };

        let new_user = NewUser {
            password: UserPassword::from_raw(&user_name, &password),
            user_name,
            email,
        };

        match self.repo.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.user_id, user_name = %user.user_name, "User signed up");
                Ok(SignUpOutcome::Created(user))
            }
            // Lost a race with a concurrent signup for the same name
            Err(AuthError::UserNameTaken) => Ok(SignUpOutcome::Rejected(SignUpErrors {
                error_username: Some(USER_EXISTS),
                ..SignUpErrors::default()
            })),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryUserRepository;

    fn input(user_name: &str, password: &str, verify: &str, email: &str) -> SignUpInput {
        SignUpInput {
            user_name: user_name.to_string(),
            password: password.to_string(),
            verify: verify.to_string(),
            email: Some(email.to_string()),
        }
    }

    fn rejected(outcome: SignUpOutcome) -> SignUpErrors {
        match outcome {
            SignUpOutcome::Rejected(errors) => errors,
            SignUpOutcome::Created(user) => panic!("unexpected signup of {}", user.user_name),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_user() {
        let repo = Arc::new(MemoryUserRepository::new());
        let use_case = SignUpUseCase::new(repo.clone());

        let outcome = use_case
            .execute(input("ab_", "pass", "pass", "ab@example.com"))
            .await
            .unwrap();

        let SignUpOutcome::Created(user) = outcome else {
            panic!("expected signup to succeed");
        };
        assert_eq!(user.user_name.as_str(), "ab_");
        assert_eq!(user.email.as_ref().map(Email::as_str), Some("ab@example.com"));
        assert!(repo.exists_by_user_name(&user.user_name).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_name_length_bounds() {
        let use_case = SignUpUseCase::new(Arc::new(MemoryUserRepository::new()));

        for name in ["ab", "this_username_is_way_too_long_12345"] {
            let errors = rejected(use_case.execute(input(name, "pass", "pass", "")).await.unwrap());
            assert_eq!(errors.error_username, Some(INVALID_USERNAME));
        }
    }

    #[tokio::test]
    async fn test_mismatched_verify_creates_nothing() {
        let repo = Arc::new(MemoryUserRepository::new());
        let use_case = SignUpUseCase::new(repo.clone());

        let errors = rejected(
            use_case
                .execute(input("carol", "pass1", "pass2", ""))
                .await
                .unwrap(),
        );

        assert_eq!(errors.error_verify, Some(PASSWORDS_MISMATCH));
        assert_eq!(errors.error_password, None);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_password_skips_verify_check() {
        let use_case = SignUpUseCase::new(Arc::new(MemoryUserRepository::new()));

        let errors = rejected(use_case.execute(input("carol", "p", "q", "")).await.unwrap());
        assert_eq!(errors.error_password, Some(INVALID_PASSWORD));
        assert_eq!(errors.error_verify, None);
    }

    #[tokio::test]
    async fn test_all_errors_reported_together() {
        let use_case = SignUpUseCase::new(Arc::new(MemoryUserRepository::new()));

        let errors = rejected(
            use_case
                .execute(input("a b", "pw", "pw", "not-an-email"))
                .await
                .unwrap(),
        );
        assert_eq!(
            errors,
            SignUpErrors {
                error_username: Some(INVALID_USERNAME),
                error_password: Some(INVALID_PASSWORD),
                error_verify: None,
                error_email: Some(INVALID_EMAIL),
            }
        );
    }

    #[tokio::test]
    async fn test_existing_user_rejected() {
        let repo = Arc::new(MemoryUserRepository::new());
        let use_case = SignUpUseCase::new(repo.clone());
        use_case
            .execute(input("dave", "pass", "pass", ""))
            .await
            .unwrap();

        let errors = rejected(use_case.execute(input("dave", "other", "other", "")).await.unwrap());
        assert_eq!(errors.error_username, Some(USER_EXISTS));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_email_is_optional() {
        let use_case = SignUpUseCase::new(Arc::new(MemoryUserRepository::new()));
        let outcome = use_case.execute(input("erin", "pass", "pass", "")).await.unwrap();
        assert!(matches!(outcome, SignUpOutcome::Created(ref u) if u.email.is_none()));
    }
}
