//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError};
use std::fmt;

use super::user_name::UserName;

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password for a new account (3 to 20 characters, no line breaks)
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// Password typed into the login form, not checked against the policy
    pub fn attempt(raw: String) -> Self {
        Self(ClearTextPassword::attempt(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored salted hash of a user's password
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash with a fresh salt
    pub fn from_raw(user_name: &UserName, raw: &RawPassword) -> Self {
        Self(raw.inner().hash(user_name.as_str()))
    }

    /// Load the `pw_hash` column
    pub fn from_db(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_stored(stored).map(Self)
    }

    pub fn verify(&self, user_name: &UserName, raw: &RawPassword) -> bool {
        self.0.verify(user_name.as_str(), raw.inner())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let name = UserName::new("alice").unwrap();
        let hashed = UserPassword::from_raw(&name, &RawPassword::new("secret".into()).unwrap());

        assert!(hashed.verify(&name, &RawPassword::attempt("secret".into())));
        assert!(!hashed.verify(&name, &RawPassword::attempt("Secret".into())));
        assert!(!hashed.verify(
            &UserName::new("alice2").unwrap(),
            &RawPassword::attempt("secret".into())
        ));
    }

    #[test]
    fn test_round_trip_through_db_value() {
        let name = UserName::new("alice").unwrap();
        let hashed = UserPassword::from_raw(&name, &RawPassword::new("secret".into()).unwrap());

        let loaded = UserPassword::from_db(hashed.as_str()).unwrap();
        assert_eq!(loaded, hashed);
        assert!(loaded.verify(&name, &RawPassword::attempt("secret".into())));
    }

    #[test]
    fn test_policy() {
        assert!(RawPassword::new("ab".into()).is_err());
        assert!(RawPassword::new("a".repeat(21)).is_err());
        assert!(RawPassword::new("any content!".into()).is_ok());
    }
}
