//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Method names are unique across the traits so one store can implement all
//! of them without call-site ambiguity.

use kernel::id::{CategoryId, ImageId, ItemId};

use crate::domain::entity::{
    category::{Category, CategoryName},
    image::{Image, NewImage},
    item::{Item, NewItem},
};
use crate::error::CatalogResult;

/// Category repository trait
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    /// Exact, case-sensitive name match
    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    /// All categories in creation order
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    async fn insert_category(&self, name: &CategoryName) -> CatalogResult<Category>;

    /// Persist name and timestamp
    async fn update_category(&self, category: &Category) -> CatalogResult<()>;

    /// Delete every item of the category, then the category, as one unit.
    /// Returns the number of items removed.
    async fn delete_category_cascade(&self, id: CategoryId) -> CatalogResult<u64>;
}

/// Item repository trait
#[trait_variant::make(ItemRepository: Send)]
pub trait LocalItemRepository {
    async fn find_item(&self, id: ItemId) -> CatalogResult<Option<Item>>;

    /// First item with exactly this title
    async fn find_item_by_title(&self, title: &str) -> CatalogResult<Option<Item>>;

    /// Items of one category in creation order
    async fn list_items_by_category(&self, category_id: CategoryId) -> CatalogResult<Vec<Item>>;

    /// Most recently modified first
    async fn list_latest_items(&self, limit: usize) -> CatalogResult<Vec<Item>>;

    async fn insert_item(&self, item: NewItem) -> CatalogResult<Item>;

    /// Persist every column of `item`
    async fn update_item(&self, item: &Item) -> CatalogResult<()>;

    /// Returns false if there was no such item
    async fn delete_item(&self, id: ItemId) -> CatalogResult<bool>;
}

/// Image repository trait
#[trait_variant::make(ImageRepository: Send)]
pub trait LocalImageRepository {
    async fn find_image(&self, id: ImageId) -> CatalogResult<Option<Image>>;

    async fn insert_image(&self, image: NewImage) -> CatalogResult<Image>;

    async fn update_image(&self, image: &Image) -> CatalogResult<()>;
}

/// Everything the catalog services need from storage
pub trait CatalogStore:
    CategoryRepository + ItemRepository + ImageRepository + Clone + Send + Sync + 'static
{
}

impl<T> CatalogStore for T where
    T: CategoryRepository + ItemRepository + ImageRepository + Clone + Send + Sync + 'static
{
}
