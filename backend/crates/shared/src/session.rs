//! Session Context
//!
//! The per-request identity resolved by the auth middleware. It is computed
//! once per request, stored in the request extensions, and never mutated
//! afterwards, so concurrent requests cannot observe each other's user.

use crate::id::UserId;

/// Authenticated user as seen by downstream handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub user_name: String,
}

/// Resolved session state for one request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

impl SessionState {
    /// Whether a user is attached to the request
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// The authenticated user, if any
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// User name for display, if any
    pub fn user_name(&self) -> Option<&str> {
        self.user().map(|u| u.user_name.as_str())
    }
}

/// Handlers take `SessionState` directly; a request that skipped the
/// session middleware is anonymous.
#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for SessionState
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_anonymous() {
        let state = SessionState::default();
        assert!(!state.is_authenticated());
        assert!(state.user_name().is_none());
    }

    #[test]
    fn test_authenticated_exposes_user() {
        let state = SessionState::Authenticated(SessionUser {
            user_id: UserId::from_i64(1),
            user_name: "alice".to_string(),
        });
        assert!(state.is_authenticated());
        assert_eq!(state.user_name(), Some("alice"));
        assert_eq!(state.user().map(|u| u.user_id.as_i64()), Some(1));
    }
}
