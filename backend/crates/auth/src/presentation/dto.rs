//! API DTOs (Data Transfer Objects)
//!
//! Form bodies come in as `application/x-www-form-urlencoded`; pages go out
//! as JSON view bags (`view` + `user` + page data).

use serde::{Deserialize, Serialize};

use crate::application::SignUpErrors;

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub view: &'static str,
    pub user: Option<String>,
    pub next_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'static str>,
}

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpView {
    pub view: &'static str,
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub errors: SignUpErrors,
}
