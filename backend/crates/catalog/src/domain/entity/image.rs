//! Image Entity
//!
//! An image is always backed by a file under the public images path.
//! `url` only records where the file was downloaded from; display uses
//! the local path.

use chrono::{DateTime, Utc};
use kernel::id::ImageId;

/// Image row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub title: Option<String>,
    /// Public path of the local copy, e.g. `/static/images/board.jpg`
    pub path: String,
    pub url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Image not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub title: Option<String>,
    pub path: String,
    pub url: Option<String>,
}

/// Replacement values for an existing image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageChanges {
    pub title: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
}

impl Image {
    /// Browser-facing source: the public prefix joined with the local path
    pub fn src(&self, url_prefix: &str) -> String {
        format!("{url_prefix}{}", self.path)
    }

    /// Apply `changes`; a supplied local path makes a supplied URL moot.
    /// The timestamp always moves.
    pub fn update(&mut self, changes: ImageChanges, now: DateTime<Utc>) {
        let ImageChanges { title, path, url } = changes;

        if let Some(title) = title {
            self.title = Some(title);
        }
        match (path, url) {
            (Some(path), _) => {
                self.path = path;
                self.url = None;
            }
            (None, Some(url)) => self.url = Some(url),
            (None, None) => {}
        }
        self.updated_at = now;
    }
}
