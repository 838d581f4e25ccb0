//! Application Configuration
//!
//! Configuration for the Catalog application layer.

use std::path::PathBuf;
use std::time::Duration;

use kernel::id::{CategoryId, ItemId};

/// Catalog application configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Application base path; also the prefix of every image `src`
    pub base_path: String,
    /// Directory downloaded images are written to
    pub images_dir: PathBuf,
    /// Public path under the base path that serves `images_dir`
    pub public_images_path: String,
    /// Number of items in the "latest" list on the home page
    pub latest_limit: usize,
    /// Grid width of the home page
    pub home_columns: usize,
    /// Grid width of a category page
    pub category_columns: usize,
    /// Upper bound for a single image download
    pub fetch_timeout: Duration,
    /// Largest image body accepted; bigger downloads are discarded
    pub max_image_bytes: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: "/catalog".to_string(),
            images_dir: PathBuf::from("static/images"),
            public_images_path: "/static/images".to_string(),
            latest_limit: 10,
            home_columns: 4,
            category_columns: 3,
            fetch_timeout: Duration::from_secs(10),
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

impl CatalogConfig {
    pub fn with_images_dir(mut self, images_dir: impl Into<PathBuf>) -> Self {
        self.images_dir = images_dir.into();
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: u64) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn home_url(&self) -> String {
        format!("{}/", self.base_path)
    }

    pub fn category_url(&self, category_id: CategoryId) -> String {
        format!("{}/categories/{category_id}/", self.base_path)
    }

    pub fn item_url(&self, category_id: CategoryId, item_id: ItemId) -> String {
        format!("{}/categories/{category_id}/items/{item_id}", self.base_path)
    }

    /// Route path under which `images_dir` is served
    pub fn images_route(&self) -> String {
        format!("{}{}", self.base_path, self.public_images_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.latest_limit, 10);
        assert_eq!(config.home_columns, 4);
        assert_eq!(config.category_columns, 3);
        assert_eq!(config.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(config.images_route(), "/catalog/static/images");
    }

    #[test]
    fn test_urls() {
        let config = CatalogConfig::default();
        assert_eq!(config.home_url(), "/catalog/");
        assert_eq!(
            config.category_url(CategoryId::from_i64(4)),
            "/catalog/categories/4/"
        );
        assert_eq!(
            config.item_url(CategoryId::from_i64(4), ItemId::from_i64(9)),
            "/catalog/categories/4/items/9"
        );
    }
}
