//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, value objects, repository trait
//! - `application/` - Sign-in, sign-up, and the session manager
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Security Model
//! - Passwords stored as salted SHA-256 (`"<hex>|<salt>"`, see
//!   `platform::password` for the limitations of that format)
//! - The session is the user id signed with HMAC-SHA256 in the `user_id`
//!   cookie, scoped to the application base path
//! - A bad or forged cookie never fails a request; it is simply anonymous
//! - Login failures never reveal whether the user exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryUserRepository, postgres::PgUserRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{require_login, resolve_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
