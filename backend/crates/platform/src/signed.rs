//! Signed Token Codec
//!
//! Tamper-evident strings of the form `"<value>|<hex hmac-sha256(secret, value)>"`.
//! Nothing is encrypted: the value travels in clear text and only its
//! integrity is protected.

use std::fmt;

use crate::crypto::{constant_time_eq, hmac_sha256};

const SEPARATOR: char = '|';

/// HMAC-SHA256 signer over a process-wide secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: [u8; 32],
}

impl TokenSigner {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    fn mac_hex(&self, value: &str) -> String {
        hex::encode(hmac_sha256(&self.secret, value.as_bytes()))
    }

    /// `"<value>|<mac>"`
    pub fn sign(&self, value: &str) -> String {
        format!("{value}{SEPARATOR}{}", self.mac_hex(value))
    }

    /// Return the embedded value when the mac matches, `None` otherwise
    ///
    /// The split happens on the last separator so values containing `|`
    /// still verify.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (value, mac) = token.rsplit_once(SEPARATOR)?;
        let expected = self.mac_hex(value);

        constant_time_eq(expected.as_bytes(), mac.as_bytes()).then(|| value.to_string())
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
