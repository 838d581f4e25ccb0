//! Password Hashing and Verification
//!
//! Stored form is `"<hex sha256(user_name + password + salt)>|<salt>"`, where
//! the salt is five ASCII letters kept in clear text next to the digest.
//!
//! ## Known limitation
//! The digest is a single fast SHA-256 pass, not a deliberately slow
//! password-hashing function. Per-user salting defeats precomputed tables
//! across accounts but does not slow down an offline brute force against a
//! leaked row. The format is kept so existing `users.pw_hash` values keep
//! verifying; moving to Argon2id needs a rehash-on-login migration.

use std::fmt;

use rand::{Rng, rngs::OsRng};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, sha256_hex};

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Number of salt characters
pub const SALT_LENGTH: usize = 5;

const SALT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const SEPARATOR: char = '|';

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Line breaks are not accepted
    #[error("Password cannot contain line breaks")]
    InvalidCharacter,
}

/// Stored hash could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Debug output is redacted and the type is not `Clone`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for a new account, enforcing the signup policy
    /// (3 to 20 characters of any content except line breaks).
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw);

        if password.0.contains(['\n', '\r']) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        let char_count = password.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(password)
    }

    /// Wrap a login attempt without applying the signup policy
    ///
    /// A policy violation on login must look exactly like a wrong password.
    pub fn attempt(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with a freshly generated salt
    pub fn hash(&self, user_name: &str) -> HashedPassword {
        HashedPassword::compute(user_name, self, &make_salt())
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Salted password digest in `"<hex>|<salt>"` form
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    value: String,
}

impl HashedPassword {
    /// Digest `user_name + password + salt` with the given salt
    pub fn compute(user_name: &str, password: &ClearTextPassword, salt: &str) -> Self {
        let mut material =
            Vec::with_capacity(user_name.len() + password.as_bytes().len() + salt.len());
        material.extend_from_slice(user_name.as_bytes());
        material.extend_from_slice(password.as_bytes());
        material.extend_from_slice(salt.as_bytes());

        let digest = sha256_hex(&material);
        material.zeroize();

        Self {
            value: format!("{digest}{SEPARATOR}{salt}"),
        }
    }

    /// Load a stored value (e.g. from the database)
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let value = s.into();
        let (digest, salt) = value
            .split_once(SEPARATOR)
            .ok_or(PasswordHashError::InvalidHashFormat)?;

        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PasswordHashError::InvalidHashFormat);
        }
        if salt.is_empty() || salt.contains(SEPARATOR) {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { value })
    }

    /// The clear-text salt carried alongside the digest
    pub fn salt(&self) -> &str {
        self.value
            .split_once(SEPARATOR)
            .map(|(_, salt)| salt)
            .unwrap_or_default()
    }

    /// Stored representation
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Recompute with the stored salt and compare the whole value
    pub fn verify(&self, user_name: &str, password: &ClearTextPassword) -> bool {
        let candidate = Self::compute(user_name, password, self.salt());
        constant_time_eq(candidate.value.as_bytes(), self.value.as_bytes())
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("salt", &self.salt())
            .finish_non_exhaustive()
    }
}

/// Verify a plaintext attempt against a stored `"<hex>|<salt>"` value
///
/// Malformed stored values never verify.
pub fn verify_password(user_name: &str, password: &str, stored: &str) -> bool {
    match HashedPassword::from_stored(stored) {
        Ok(hashed) => hashed.verify(user_name, &ClearTextPassword::attempt(password.to_string())),
        Err(_) => false,
    }
}

/// Five random ASCII letters
pub fn make_salt() -> String {
    let mut rng = OsRng;
    (0..SALT_LENGTH)
        .map(|_| char::from(SALT_ALPHABET[rng.gen_range(0..SALT_ALPHABET.len())]))
        .collect()
}
