//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;

use platform::cookie::CookieConfig;
use platform::crypto::random_key;
use platform::signed::TokenSigner;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// Application base path; the cookie is scoped to it
    pub base_path: String,
    /// Process-wide HMAC key for the session cookie (32 bytes)
    pub session_secret: [u8; 32],
    /// Whether to set the Secure cookie attribute
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl AuthConfig {
    pub fn new(base_path: impl Into<String>, session_secret: [u8; 32]) -> Self {
        Self {
            cookie_name: "user_id".to_string(),
            base_path: base_path.into(),
            session_secret,
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
        }
    }

    /// Create config with a random session secret
    ///
    /// Cookies issued under a random secret stop verifying after a restart.
    pub fn with_random_secret() -> Self {
        Self::new("/catalog", random_key())
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig::new(&self.cookie_name, &self.base_path)
            .with_secure(self.cookie_secure)
            .with_same_site(self.cookie_same_site)
    }

    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(self.session_secret)
    }

    /// `<base>/`
    pub fn home_path(&self) -> String {
        format!("{}/", self.base_path)
    }

    /// `<base>/login/`
    pub fn login_path(&self) -> String {
        format!("{}/login/", self.base_path)
    }

    /// Login page that sends the user back to `next` afterwards
    pub fn login_redirect(&self, next: &str) -> String {
        format!("{}?next={}", self.login_path(), urlencoding::encode(next))
    }

    /// Accept only local absolute paths as a post-login target
    pub fn safe_next_url(&self, next: Option<&str>) -> String {
        match next.map(str::trim) {
            Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') => {
                next.to_string()
            }
            _ => self.home_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie_name", &self.cookie_name)
            .field("base_path", &self.base_path)
            .field("session_secret", &"[REDACTED]")
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = AuthConfig::development();
        assert_eq!(config.home_path(), "/catalog/");
        assert_eq!(config.login_path(), "/catalog/login/");
        assert_eq!(
            config.login_redirect("/catalog/categories/new"),
            "/catalog/login/?next=%2Fcatalog%2Fcategories%2Fnew"
        );
        assert_eq!(
            config.login_redirect("/catalog/search?q=a b"),
            "/catalog/login/?next=%2Fcatalog%2Fsearch%3Fq%3Da%20b"
        );

        let redirect = config.login_redirect("/catalog/search?q=a&b");
        let (_, next) = redirect.split_once("?next=").unwrap();
        assert_eq!(urlencoding::decode(next).unwrap(), "/catalog/search?q=a&b");
    }

    #[test]
    fn test_safe_next_url() {
        let config = AuthConfig::development();
        assert_eq!(
            config.safe_next_url(Some("/catalog/categories/1/")),
            "/catalog/categories/1/"
        );
        assert_eq!(config.safe_next_url(None), "/catalog/");
        assert_eq!(config.safe_next_url(Some("")), "/catalog/");
        assert_eq!(config.safe_next_url(Some("https://evil.example")), "/catalog/");
        assert_eq!(config.safe_next_url(Some("//evil.example")), "/catalog/");
        assert_eq!(config.safe_next_url(Some("/\\evil.example")), "/catalog/");
    }

    #[test]
    fn test_cookie_config() {
        let cookie = AuthConfig::development().cookie_config();
        assert_eq!(cookie.name, "user_id");
        assert_eq!(cookie.path, "/catalog");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new("/catalog", [9u8; 32]);
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("9, 9"));
    }
}
