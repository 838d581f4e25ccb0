//! Server Configuration
//!
//! Everything comes from the environment (after `.env` is loaded).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use catalog::CatalogConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_IMAGES_DIR: &str = "static/images";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_secret: [u8; 32],
    pub images_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub max_image_bytes: u64,
    pub cookie_secure: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret_b64) => decode_secret(&secret_b64)?,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set; using a random key for this process");
                AuthConfig::with_random_secret().session_secret
            }
            Err(_) => bail!("SESSION_SECRET must be set in production"),
        };

        let images_dir = env::var("IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_IMAGES_DIR));

        let fetch_timeout = match env::var("FETCH_TIMEOUT_SECS") {
            Ok(secs) => secs
                .trim()
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let max_image_bytes = match env::var("MAX_IMAGE_BYTES") {
            Ok(bytes) => bytes
                .trim()
                .parse()
                .context("MAX_IMAGE_BYTES must be a whole number of bytes")?,
            Err(_) => DEFAULT_MAX_IMAGE_BYTES,
        };

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
            images_dir,
            fetch_timeout: Duration::from_secs(fetch_timeout),
            max_image_bytes,
            cookie_secure,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            cookie_secure: self.cookie_secure,
            ..AuthConfig::new("/catalog", self.session_secret)
        }
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::default()
            .with_images_dir(self.images_dir.clone())
            .with_fetch_timeout(self.fetch_timeout)
            .with_max_image_bytes(self.max_image_bytes)
    }
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        assert_eq!(decode_secret(&encoded).unwrap(), [7u8; 32]);

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
