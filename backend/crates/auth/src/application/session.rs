//! Session Manager
//!
//! The session is nothing more than the signed user id in the `user_id`
//! cookie. There is no server-side session table: a cookie is valid as long
//! as its mac verifies and the user still exists.

use std::sync::Arc;

use axum::http::HeaderMap;
use kernel::id::UserId;
use kernel::session::SessionState;
use platform::cookie::{CookieConfig, extract_cookie};
use platform::signed::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;

/// Issues, reads, and clears the session cookie
pub struct SessionManager<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    signer: TokenSigner,
    cookie: CookieConfig,
}

impl<R> SessionManager<R>
where
    R: UserRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: &AuthConfig) -> Self {
        Self {
            repo,
            signer: config.signer(),
            cookie: config.cookie_config(),
        }
    }

    /// `Set-Cookie` value that logs `user` in on subsequent requests
    pub fn establish(&self, user: &User) -> String {
        let token = self.signer.sign(&user.user_id.to_string());
        self.cookie.build_set_cookie(&token)
    }

    /// `Set-Cookie` value that logs the browser out
    pub fn clear(&self) -> String {
        self.cookie.build_clear_cookie()
    }

    /// Resolve the request's cookie into a session state
    ///
    /// Never fails: a missing, malformed, or forged cookie, an unknown user,
    /// and a storage error all resolve to `Anonymous`.
    pub async fn resolve(&self, headers: &HeaderMap) -> SessionState {
        let Some(token) = extract_cookie(headers, &self.cookie.name) else {
            return SessionState::Anonymous;
        };

        let Some(user_id) = self
            .signer
            .verify(&token)
            .and_then(|value| value.parse::<UserId>().ok())
        else {
            tracing::warn!("Rejected session cookie with invalid signature");
            return SessionState::Anonymous;
        };

        match self.repo.find_by_id(user_id).await {
            Ok(Some(user)) => SessionState::Authenticated(user.session_user()),
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "Session cookie for unknown user");
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Session lookup failed");
                SessionState::Anonymous
            }
        }
    }
}
