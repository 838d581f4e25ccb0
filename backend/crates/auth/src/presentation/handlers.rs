//! HTTP Handlers

use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::session::SessionState;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    SessionManager, SignInInput, SignInUseCase, SignUpErrors, SignUpInput, SignUpOutcome,
    SignUpUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginForm, LoginQuery, LoginView, SignUpForm, SignUpView};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    pub fn sessions(&self) -> SessionManager<R> {
        SessionManager::new(self.repo.clone(), &self.config)
    }
}

fn display_name(session: &SessionState) -> Option<String> {
    session.user_name().map(str::to_string)
}

// ============================================================================
// Login
// ============================================================================

/// GET /catalog/login/
pub async fn login_form<R>(
    State(state): State<AuthAppState<R>>,
    session: SessionState,
    Query(query): Query<LoginQuery>,
) -> Json<LoginView>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Json(LoginView {
        view: "login",
        user: display_name(&session),
        next_url: state.config.safe_next_url(query.next.as_deref()),
        error_message: None,
    })
}

/// POST /catalog/login/
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    session: SessionState,
    Form(form): Form<LoginForm>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let next_url = state.config.safe_next_url(form.next_url.as_deref());

    let use_case = SignInUseCase::new(state.repo.clone());
    let input = SignInInput {
        user_name: form.username,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(user) => {
            let cookie = state.sessions().establish(&user);
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&next_url)).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Invalid login attempt");
            let view = LoginView {
                view: "login",
                user: display_name(&session),
                next_url,
                error_message: Some("Invalid Login"),
            };
            Ok((StatusCode::UNAUTHORIZED, Json(view)).into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// GET /catalog/signup/
pub async fn sign_up_form(session: SessionState) -> Json<SignUpView> {
    Json(SignUpView {
        view: "signup",
        user: display_name(&session),
        username: None,
        email: None,
        errors: SignUpErrors::default(),
    })
}

/// POST /catalog/signup/
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    session: SessionState,
    Form(form): Form<SignUpForm>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone());

    let username = form.username.clone();
    let email = form.email.clone();
    let input = SignUpInput {
        user_name: form.username,
        password: form.password,
        verify: form.verify,
        email: form.email,
    };

    match use_case.execute(input).await? {
        SignUpOutcome::Created(user) => {
            let cookie = state.sessions().establish(&user);
            let home = state.config.home_path();
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&home)).into_response())
        }
        SignUpOutcome::Rejected(errors) => {
            let view = SignUpView {
                view: "signup",
                user: display_name(&session),
                username: Some(username),
                email,
                errors,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /catalog/logout/
pub async fn logout<R>(State(state): State<AuthAppState<R>>, session: SessionState) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(user) = session.user() {
        tracing::info!(user_id = %user.user_id, "User signed out");
    }

    let cookie = state.sessions().clear();
    let home = state.config.home_path();
    ([(header::SET_COOKIE, cookie)], Redirect::to(&home)).into_response()
}
