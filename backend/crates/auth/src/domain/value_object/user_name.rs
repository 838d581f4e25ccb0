//! User Name Value Object
//!
//! Public handle used for login and display.
//!
//! ## Invariants
//! - Length: 3 to 20 characters
//! - Characters: ASCII letters, digits, `_` and `-`
//! - Case is preserved; `Bob` and `bob` are different users

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 20;

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name must be at least {min} characters (got {length})")]
    TooShort { length: usize, min: usize },

    #[error("User name must be at most {max} characters (got {length})")]
    TooLong { length: usize, max: usize },

    #[error("User name contains invalid character: '{0}'")]
    InvalidCharacter(char),
}

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl Into<String>) -> Result<Self, UserNameError> {
        let value = input.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    fn validate(value: &str) -> Result<(), UserNameError> {
        if let Some(c) = value.chars().find(|c| !Self::is_valid_char(*c)) {
            return Err(UserNameError::InvalidCharacter(c));
        }

        // ASCII only from here, so bytes == chars
        let length = value.len();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        Ok(())
    }

    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        for name in ["ab_", "bob", "Alice-99", "a_b-c", &"x".repeat(20)] {
            assert!(UserName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            UserName::new("ab"),
            Err(UserNameError::TooShort { length: 2, min: 3 })
        );
        assert!(UserName::new("").is_err());
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            UserName::new("this_username_is_way_too_long_12345"),
            Err(UserNameError::TooLong {
                length: 35,
                max: 20
            })
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            UserName::new("bob smith"),
            Err(UserNameError::InvalidCharacter(' '))
        );
        assert_eq!(
            UserName::new("bob.smith"),
            Err(UserNameError::InvalidCharacter('.'))
        );
        assert!(UserName::new("ボブ太郎").is_err());
    }

    #[test]
    fn test_case_preserved() {
        let name = UserName::new("BobSmith").unwrap();
        assert_eq!(name.as_str(), "BobSmith");
        assert_ne!(name, UserName::new("bobsmith").unwrap());
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<UserName, _> = serde_json::from_str("\"bob\"");
        assert!(ok.is_ok());
        let bad: Result<UserName, _> = serde_json::from_str("\"b\"");
        assert!(bad.is_err());
    }
}
