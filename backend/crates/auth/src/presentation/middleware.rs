//! Auth Middleware
//!
//! `resolve_session` runs on every request and attaches an immutable
//! `SessionState`. `require_login` runs on protected routes only, after
//! `resolve_session`, and rejects anonymous callers before the handler is
//! invoked.

use axum::body::Body;
use axum::extract::{OriginalUri, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use kernel::session::SessionState;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::AuthAppState;

/// Resolve the session cookie into `SessionState` in the request extensions
pub async fn resolve_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let session = state.sessions().resolve(req.headers()).await;
    req.extensions_mut().insert(session);

    next.run(req).await
}

/// Redirect anonymous callers to the login page, remembering where they were
pub async fn require_login(
    State(config): State<Arc<AuthConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let authenticated = req
        .extensions()
        .get::<SessionState>()
        .is_some_and(SessionState::is_authenticated);

    if !authenticated {
        let uri = req
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| req.uri().clone());
        let next_path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        tracing::debug!(path = %next_path, "Anonymous request to protected route");
        return Redirect::to(&config.login_redirect(&next_path)).into_response();
    }

    next.run(req).await
}
