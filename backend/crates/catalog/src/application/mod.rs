//! Application Layer
//!
//! Catalog services and configuration.

pub mod category;
pub mod config;
pub mod feed;
pub mod image;
pub mod item;
pub mod search;

// Re-exports
pub use category::CategoryService;
pub use config::CatalogConfig;
pub use feed::{CategoryEntry, FeedService, ItemEntry};
pub use image::ImageService;
pub use item::{CreateItem, EditItem, ItemService};
pub use search::{SearchResult, search};
