//! Item Service

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{CategoryId, ItemId};

use crate::application::image::ImageService;
use crate::domain::entity::image::Image;
use crate::domain::entity::item::{Item, ItemPatch, NewItem, validate_title};
use crate::domain::fetcher::AssetFetcher;
use crate::domain::repository::CatalogStore;
use crate::error::{CatalogError, CatalogResult};

/// New item form
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
}

/// Edit item form; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct EditItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
}

pub struct ItemService<R, F>
where
    R: CatalogStore,
    F: AssetFetcher,
{
    repo: Arc<R>,
    images: ImageService<R, F>,
}

impl<R, F> ItemService<R, F>
where
    R: CatalogStore,
    F: AssetFetcher + Sync,
{
    pub fn new(repo: Arc<R>, fetcher: Arc<F>) -> Self {
        Self {
            images: ImageService::new(repo.clone(), fetcher),
            repo,
        }
    }

    pub fn images(&self) -> &ImageService<R, F> {
        &self.images
    }

    pub async fn get(&self, id: ItemId) -> CatalogResult<Item> {
        self.repo
            .find_item(id)
            .await?
            .ok_or(CatalogError::ItemNotFound(id))
    }

    /// Item addressed through its category; a mismatched pair is not found
    pub async fn get_in_category(&self, category_id: CategoryId, id: ItemId) -> CatalogResult<Item> {
        let item = self.get(id).await?;
        if item.category_id != category_id {
            return Err(CatalogError::ItemNotFound(id));
        }
        Ok(item)
    }

    /// First item titled exactly `title`
    pub async fn find_by_title(&self, title: &str) -> CatalogResult<Option<Item>> {
        self.repo.find_item_by_title(title).await
    }

    /// Most recently modified first, at most `limit`
    pub async fn latest(&self, limit: usize) -> CatalogResult<Vec<Item>> {
        self.repo.list_latest_items(limit).await
    }

    /// The item's image, or `None` for no or a dangling reference
    pub async fn image_of(&self, item: &Item) -> CatalogResult<Option<Image>> {
        self.images.resolve(item.image_id).await
    }

    async fn ensure_category(&self, id: CategoryId) -> CatalogResult<()> {
        match self.repo.find_category(id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::CategoryNotFound(id)),
        }
    }

    /// Create an item; an image URL that cannot be fetched leaves the item
    /// without an image rather than failing the request
    pub async fn create(&self, input: CreateItem) -> CatalogResult<Item> {
        let title = validate_title(&input.title)?;
        self.ensure_category(input.category_id).await?;

        let image = match input.image_url {
            Some(url) => self.images.store(None, None, Some(url)).await?,
            None => None,
        };

        let item = self
            .repo
            .insert_item(NewItem {
                title,
                description: input.description,
                category_id: input.category_id,
                image_id: image.map(|i| i.id),
            })
            .await?;

        tracing::info!(
            item_id = %item.id,
            category_id = %item.category_id,
            has_image = item.image_id.is_some(),
            "Item created"
        );

        Ok(item)
    }

    /// Partial update
    ///
    /// A new image URL refreshes the item's existing image in place, or
    /// creates one when the item has none (or only a dangling reference).
    pub async fn update(&self, id: ItemId, input: EditItem) -> CatalogResult<Item> {
        let mut item = self.get(id).await?;

        let title = input.title.as_deref().map(validate_title).transpose()?;
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }

        let mut image_id = None;
        if let Some(url) = input.image_url {
            match self.images.resolve(item.image_id).await? {
                Some(existing) => {
                    if self.images.refresh_from_url(existing.id, &url).await?.is_none() {
                        tracing::warn!(item_id = %id, "Image refresh failed; keeping old image");
                    }
                }
                None => match self.images.store(None, None, Some(url)).await? {
                    Some(image) => image_id = Some(image.id),
                    None => tracing::warn!(item_id = %id, "Image download failed; item has no image"),
                },
            }
        }

        let patch = ItemPatch {
            title,
            description: input.description,
            category_id: input.category_id,
            image_id,
        };

        if item.apply(patch, Utc::now()) {
            self.repo.update_item(&item).await?;
            tracing::info!(item_id = %id, "Item updated");
        }

        Ok(item)
    }

    /// Delete one item; its image row is left in place
    pub async fn delete(&self, id: ItemId) -> CatalogResult<Item> {
        let item = self.get(id).await?;
        if !self.repo.delete_item(id).await? {
            return Err(CatalogError::ItemNotFound(id));
        }

        tracing::info!(item_id = %id, title = %item.title, "Item deleted");
        Ok(item)
    }
}
