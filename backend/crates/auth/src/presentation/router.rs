//! Auth Router

use axum::{Router, routing::get};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Login, signup, and logout pages under the configured base path
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let base = state.config.base_path.clone();

    Router::new()
        .route(
            &format!("{base}/login/"),
            get(handlers::login_form::<R>).post(handlers::login::<R>),
        )
        .route(
            &format!("{base}/signup/"),
            get(handlers::sign_up_form).post(handlers::sign_up::<R>),
        )
        .route(&format!("{base}/logout/"), get(handlers::logout::<R>))
        .with_state(state)
}
