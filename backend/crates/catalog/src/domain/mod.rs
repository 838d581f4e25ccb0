//! Domain Layer
//!
//! Contains entities, repository traits, and the asset fetcher seam.

pub mod entity;
pub mod fetcher;
pub mod repository;

// Re-exports
pub use entity::{
    category::{Category, CategoryName},
    image::{Image, ImageChanges, NewImage},
    item::{Item, ItemPatch, NewItem},
};
pub use fetcher::AssetFetcher;
pub use repository::{CatalogStore, CategoryRepository, ImageRepository, ItemRepository};
