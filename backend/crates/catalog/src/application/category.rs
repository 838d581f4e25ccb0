//! Category Service

use std::sync::Arc;

use chrono::Utc;
use kernel::id::CategoryId;

use crate::domain::entity::category::{
    CATEGORY_EXISTS, CATEGORY_NAME_FIELD, Category, CategoryName,
};
use crate::domain::entity::item::Item;
use crate::domain::repository::{CategoryRepository, ItemRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct CategoryService<R>
where
    R: CategoryRepository + ItemRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository + ItemRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: CategoryId) -> CatalogResult<Category> {
        self.repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Existence check by exact name; absent is not an error
    pub async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        self.repo.find_category_by_name(name).await
    }

    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        self.repo.list_categories().await
    }

    /// Items of an existing category
    pub async fn items(&self, id: CategoryId) -> CatalogResult<Vec<Item>> {
        self.get(id).await?;
        self.repo.list_items_by_category(id).await
    }

    pub async fn create(&self, name: &str) -> CatalogResult<Category> {
        let name = CategoryName::new(name)?;
        if self.repo.find_category_by_name(name.as_str()).await?.is_some() {
            return Err(CatalogError::validation(CATEGORY_NAME_FIELD, CATEGORY_EXISTS));
        }

        let category = self.repo.insert_category(&name).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");

        Ok(category)
    }

    /// Rename; items reference the category by id and are left alone
    pub async fn rename(&self, id: CategoryId, name: &str) -> CatalogResult<Category> {
        let mut category = self.get(id).await?;
        let name = CategoryName::new(name)?;

        if let Some(other) = self.repo.find_category_by_name(name.as_str()).await? {
            if other.id != id {
                return Err(CatalogError::validation(CATEGORY_NAME_FIELD, CATEGORY_EXISTS));
            }
        }

        if category.rename(name, Utc::now()) {
            self.repo.update_category(&category).await?;
            tracing::info!(category_id = %id, name = %category.name, "Category renamed");
        }

        Ok(category)
    }

    /// Delete the category and all of its items; returns the deleted category
    pub async fn delete(&self, id: CategoryId) -> CatalogResult<Category> {
        let category = self.get(id).await?;
        let items_deleted = self.repo.delete_category_cascade(id).await?;

        tracing::info!(
            category_id = %id,
            name = %category.name,
            items_deleted,
            "Category deleted"
        );

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::category::EMPTY_CATEGORY_NAME;
    use crate::domain::entity::item::NewItem;
    use crate::infra::memory::MemoryCatalogRepository;

    fn service() -> (CategoryService<MemoryCatalogRepository>, MemoryCatalogRepository) {
        let repo = MemoryCatalogRepository::new();
        (CategoryService::new(Arc::new(repo.clone())), repo)
    }

    fn marker(err: CatalogError) -> (&'static str, &'static str) {
        match err {
            CatalogError::Validation { field, message } => (field, message),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (categories, _) = service();
        let created = categories.create("Snowboarding").await.unwrap();

        assert_eq!(categories.get(created.id).await.unwrap(), created);
        assert_eq!(
            categories.find_by_name("Snowboarding").await.unwrap(),
            Some(created)
        );
        assert_eq!(categories.find_by_name("Skiing").await.unwrap(), None);
        assert!(
            categories
                .get(CategoryId::from_i64(404))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_create_validation_markers() {
        let (categories, _) = service();
        categories.create("Soccer").await.unwrap();

        assert_eq!(
            marker(categories.create("  ").await.unwrap_err()),
            (CATEGORY_NAME_FIELD, EMPTY_CATEGORY_NAME)
        );
        assert_eq!(
            marker(categories.create("Soccer").await.unwrap_err()),
            (CATEGORY_NAME_FIELD, CATEGORY_EXISTS)
        );
        assert_eq!(categories.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let (categories, _) = service();
        let soccer = categories.create("Soccer").await.unwrap();
        categories.create("Hockey").await.unwrap();

        let same = categories.rename(soccer.id, "Soccer").await.unwrap();
        assert_eq!(same.updated_at, soccer.updated_at);

        assert_eq!(
            marker(categories.rename(soccer.id, "Hockey").await.unwrap_err()),
            (CATEGORY_NAME_FIELD, CATEGORY_EXISTS)
        );

        let renamed = categories.rename(soccer.id, "Football").await.unwrap();
        assert_eq!(renamed.name, "Football");
        assert!(renamed.updated_at >= soccer.updated_at);
        assert_eq!(categories.find_by_name("Soccer").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let (categories, repo) = service();
        let snow = categories.create("Snowboarding").await.unwrap();
        let other = categories.create("Frisbee").await.unwrap();

        let mut snow_items = Vec::new();
        for title in ["Board", "Goggles", "Boots"] {
            let item = repo
                .insert_item(NewItem {
                    title: title.into(),
                    description: String::new(),
                    category_id: snow.id,
                    image_id: None,
                })
                .await
                .unwrap();
            snow_items.push(item.id);
        }
        let kept = repo
            .insert_item(NewItem {
                title: "Disc".into(),
                description: String::new(),
                category_id: other.id,
                image_id: None,
            })
            .await
            .unwrap();

        let deleted = categories.delete(snow.id).await.unwrap();
        assert_eq!(deleted.name, "Snowboarding");

        assert_eq!(repo.count_items_in(snow.id).unwrap(), 0);
        for id in snow_items {
            assert_eq!(repo.find_item(id).await.unwrap(), None);
        }
        assert_eq!(categories.find_by_name("Snowboarding").await.unwrap(), None);
        assert!(categories.items(snow.id).await.unwrap_err().is_not_found());
        assert_eq!(repo.find_item(kept.id).await.unwrap(), Some(kept));
    }

    #[tokio::test]
    async fn test_delete_unknown_category() {
        let (categories, _) = service();
        let err = categories.delete(CategoryId::from_i64(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(_)));
    }
}
