//! Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Categories, items, images, repository and fetcher traits
//! - `application/` - Services, feeds, search, configuration
//! - `infra/` - PostgreSQL and in-memory stores, HTTP image fetcher
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Data rules
//! - Deleting a category deletes its items in the same transaction
//! - Item → image is a loose reference; a missing image reads as no image
//! - Updates only move `updated_at` when a value actually changed
//! - An image URL that cannot be downloaded never fails the item write

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use infra::{HttpAssetFetcher, MemoryCatalogRepository, PgCatalogRepository};
pub use presentation::handlers::CatalogAppState;
pub use presentation::router::{catalog_protected_router, catalog_public_router};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::fetcher::AssetFetcher;

    /// Fetcher that never touches the network
    #[derive(Clone, Debug)]
    pub struct StubFetcher {
        path: Option<String>,
    }

    impl StubFetcher {
        /// Every fetch "succeeds" with this local path
        pub fn serving(path: &str) -> Self {
            Self {
                path: Some(path.to_string()),
            }
        }

        pub fn failing() -> Self {
            Self { path: None }
        }
    }

    impl AssetFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Option<String> {
            self.path.clone()
        }
    }
}
