//! Category Entity

use chrono::{DateTime, Utc};
use kernel::id::CategoryId;
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

pub const CATEGORY_NAME_FIELD: &str = "category_name";
pub const EMPTY_CATEGORY_NAME: &str = "Empty Category Name";
pub const CATEGORY_EXISTS: &str = "Category already exists";

/// Maximum category name length (in characters)
pub const CATEGORY_NAME_MAX_LENGTH: usize = 250;

/// Non-empty, trimmed category name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(input: impl AsRef<str>) -> CatalogResult<Self> {
        let name = input.as_ref().trim();
        if name.is_empty() {
            return Err(CatalogError::validation(
                CATEGORY_NAME_FIELD,
                EMPTY_CATEGORY_NAME,
            ));
        }
        if name.chars().count() > CATEGORY_NAME_MAX_LENGTH {
            return Err(CatalogError::validation(
                CATEGORY_NAME_FIELD,
                "Category Name Too Long",
            ));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Rename; returns false (and keeps the timestamp) when the name is unchanged
    pub fn rename(&mut self, name: CategoryName, now: DateTime<Utc>) -> bool {
        if self.name == name.as_str() {
            return false;
        }
        self.name = name.0;
        self.updated_at = now;
        true
    }
}
