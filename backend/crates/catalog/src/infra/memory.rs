//! In-Memory Repository
//!
//! All three catalog repositories over one mutex-guarded store. A single
//! lock covers the cascade delete, so readers never see it half done.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::id::{CategoryId, ImageId, ItemId};

use crate::domain::entity::{
    category::{Category, CategoryName},
    image::{Image, NewImage},
    item::{Item, NewItem},
};
use crate::domain::repository::{CategoryRepository, ImageRepository, ItemRepository};
use crate::error::{CatalogError, CatalogResult};

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    items: Vec<Item>,
    images: Vec<Image>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory catalog store; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryCatalogRepository {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CatalogResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| CatalogError::Internal("catalog store lock poisoned".to_string()))
    }

    /// Drop an image row, leaving any item references dangling
    pub fn remove_image(&self, id: ImageId) -> CatalogResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.images.len();
        inner.images.retain(|i| i.id != id);
        Ok(inner.images.len() != before)
    }

    /// Number of items pointing at `category_id`
    pub fn count_items_in(&self, category_id: CategoryId) -> CatalogResult<usize> {
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|i| i.category_id == category_id)
            .count())
    }
}

impl CategoryRepository for MemoryCatalogRepository {
    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        Ok(self
            .lock()?
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.lock()?.categories.clone())
    }

    async fn insert_category(&self, name: &CategoryName) -> CatalogResult<Category> {
        let mut inner = self.lock()?;
        let category = Category {
            id: CategoryId::from_i64(inner.next_id()),
            name: name.to_string(),
            updated_at: Utc::now(),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, category: &Category) -> CatalogResult<()> {
        let mut inner = self.lock()?;
        let slot = inner
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or(CatalogError::CategoryNotFound(category.id))?;
        *slot = category.clone();
        Ok(())
    }

    async fn delete_category_cascade(&self, id: CategoryId) -> CatalogResult<u64> {
        let mut inner = self.lock()?;
        if !inner.categories.iter().any(|c| c.id == id) {
            return Err(CatalogError::CategoryNotFound(id));
        }

        let before = inner.items.len();
        inner.items.retain(|i| i.category_id != id);
        let removed = (before - inner.items.len()) as u64;
        inner.categories.retain(|c| c.id != id);

        Ok(removed)
    }
}

impl ItemRepository for MemoryCatalogRepository {
    async fn find_item(&self, id: ItemId) -> CatalogResult<Option<Item>> {
        Ok(self.lock()?.items.iter().find(|i| i.id == id).cloned())
    }

    async fn find_item_by_title(&self, title: &str) -> CatalogResult<Option<Item>> {
        Ok(self
            .lock()?
            .items
            .iter()
            .find(|i| i.title == title)
            .cloned())
    }

    async fn list_items_by_category(&self, category_id: CategoryId) -> CatalogResult<Vec<Item>> {
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|i| i.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn list_latest_items(&self, limit: usize) -> CatalogResult<Vec<Item>> {
        let mut items = self.lock()?.items.clone();
        items.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items.truncate(limit);
        Ok(items)
    }

    async fn insert_item(&self, item: NewItem) -> CatalogResult<Item> {
        let mut inner = self.lock()?;
        if !inner.categories.iter().any(|c| c.id == item.category_id) {
            return Err(CatalogError::CategoryNotFound(item.category_id));
        }

        let item = Item {
            id: ItemId::from_i64(inner.next_id()),
            title: item.title,
            description: item.description,
            category_id: item.category_id,
            image_id: item.image_id,
            updated_at: Utc::now(),
        };
        inner.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, item: &Item) -> CatalogResult<()> {
        let mut inner = self.lock()?;
        if !inner.categories.iter().any(|c| c.id == item.category_id) {
            return Err(CatalogError::CategoryNotFound(item.category_id));
        }
        let slot = inner
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or(CatalogError::ItemNotFound(item.id))?;
        *slot = item.clone();
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> CatalogResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.items.len();
        inner.items.retain(|i| i.id != id);
        Ok(inner.items.len() != before)
    }
}

impl ImageRepository for MemoryCatalogRepository {
    async fn find_image(&self, id: ImageId) -> CatalogResult<Option<Image>> {
        Ok(self.lock()?.images.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_image(&self, image: NewImage) -> CatalogResult<Image> {
        let mut inner = self.lock()?;
        let image = Image {
            id: ImageId::from_i64(inner.next_id()),
            title: image.title,
            path: image.path,
            url: image.url,
            updated_at: Utc::now(),
        };
        inner.images.push(image.clone());
        Ok(image)
    }

    async fn update_image(&self, image: &Image) -> CatalogResult<()> {
        let mut inner = self.lock()?;
        let slot = inner
            .images
            .iter_mut()
            .find(|i| i.id == image.id)
            .ok_or(CatalogError::ImageNotFound(image.id))?;
        *slot = image.clone();
        Ok(())
    }
}
