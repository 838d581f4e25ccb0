//! Email Value Object
//!
//! Shape check only (`text@text.text`, no whitespace). Nothing is sent to
//! the address.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid email format")]
pub struct EmailError;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into();
        if Self::is_valid_format(&email) {
            Ok(Self(email))
        } else {
            Err(EmailError)
        }
    }

    /// `local@domain.tld` where each part is non-empty and may itself
    /// contain `@` or `.`
    fn is_valid_format(email: &str) -> bool {
        if email.is_empty() || email.chars().any(char::is_whitespace) {
            return false;
        }

        email.match_indices('@').any(|(at, _)| {
            let domain = &email[at + 1..];
            at > 0
                && domain
                    .match_indices('.')
                    .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.c", "bob@example.com", "first.last@mail.co.uk", "a@b@c.d"] {
            assert!(Email::new(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "bob",
            "bob@",
            "@example.com",
            "bob@example",
            "bob@.com",
            "bob@example.",
            "bob smith@example.com",
        ] {
            assert!(Email::new(email).is_err(), "{email} should be invalid");
        }
    }
}
