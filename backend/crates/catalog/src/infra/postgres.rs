//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ImageId, ItemId};
use sqlx::PgPool;

use crate::domain::entity::{
    category::{CATEGORY_EXISTS, CATEGORY_NAME_FIELD, Category, CategoryName},
    image::{Image, NewImage},
    item::{Item, NewItem},
};
use crate::domain::repository::{CategoryRepository, ImageRepository, ItemRepository};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, updated_at";
const ITEM_COLUMNS: &str = "id, title, description, category_id, image_id, updated_at";
const IMAGE_COLUMNS: &str = "id, title, path, url, updated_at";

/// Map a unique violation on `categories.name` to the form marker
fn category_write_error(e: sqlx::Error) -> CatalogError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            CatalogError::validation(CATEGORY_NAME_FIELD, CATEGORY_EXISTS)
        }
        other => CatalogError::Database(other),
    }
}

// ============================================================================
// Category Repository Implementation
// ============================================================================

impl CategoryRepository for PgCatalogRepository {
    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_category(&self, name: &CategoryName) -> CatalogResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO categories (name) VALUES ($1) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(category_write_error)?;

        Ok(row.into())
    }

    async fn update_category(&self, category: &Category) -> CatalogResult<()> {
        let result = sqlx::query("UPDATE categories SET name = $2, updated_at = $3 WHERE id = $1")
            .bind(category.id.as_i64())
            .bind(&category.name)
            .bind(category.updated_at)
            .execute(&self.pool)
            .await
            .map_err(category_write_error)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CategoryNotFound(category.id));
        }
        Ok(())
    }

    async fn delete_category_cascade(&self, id: CategoryId) -> CatalogResult<u64> {
        let mut tx = self.pool.begin().await?;

        let items_deleted = sqlx::query("DELETE FROM items WHERE category_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let categories_deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if categories_deleted == 0 {
            // Dropping `tx` rolls back the item deletes
            return Err(CatalogError::CategoryNotFound(id));
        }

        tx.commit().await?;
        Ok(items_deleted)
    }
}

// ============================================================================
// Item Repository Implementation
// ============================================================================

impl ItemRepository for PgCatalogRepository {
    async fn find_item(&self, id: ItemId) -> CatalogResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_item_by_title(&self, title: &str) -> CatalogResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE title = $1 ORDER BY id LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_items_by_category(&self, category_id: CategoryId) -> CatalogResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_latest_items(&self, limit: usize) -> CatalogResult<Vec<Item>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY updated_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_item(&self, item: NewItem) -> CatalogResult<Item> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO items (title, description, category_id, image_id) \
             VALUES ($1, $2, $3, $4) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.category_id.as_i64())
        .bind(item.image_id.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                CatalogError::CategoryNotFound(item.category_id)
            }
            other => CatalogError::Database(other),
        })?;

        Ok(row.into())
    }

    async fn update_item(&self, item: &Item) -> CatalogResult<()> {
        let result = sqlx::query(
            "UPDATE items SET title = $2, description = $3, category_id = $4, image_id = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(item.id.as_i64())
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.category_id.as_i64())
        .bind(item.image_id.map(|id| id.as_i64()))
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                CatalogError::CategoryNotFound(item.category_id)
            }
            other => CatalogError::Database(other),
        })?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ItemNotFound(item.id));
        }
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Image Repository Implementation
// ============================================================================

impl ImageRepository for PgCatalogRepository {
    async fn find_image(&self, id: ImageId) -> CatalogResult<Option<Image>> {
        let row = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_image(&self, image: NewImage) -> CatalogResult<Image> {
        let row = sqlx::query_as::<_, ImageRow>(&format!(
            "INSERT INTO images (title, path, url) VALUES ($1, $2, $3) RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(&image.title)
        .bind(&image.path)
        .bind(&image.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_image(&self, image: &Image) -> CatalogResult<()> {
        let result = sqlx::query(
            "UPDATE images SET title = $2, path = $3, url = $4, updated_at = $5 WHERE id = $1",
        )
        .bind(image.id.as_i64())
        .bind(&image.title)
        .bind(&image.path)
        .bind(&image.url)
        .bind(image.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ImageNotFound(image.id));
        }
        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId::from_i64(row.id),
            name: row.name,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    title: String,
    description: String,
    category_id: i64,
    image_id: Option<i64>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::from_i64(row.id),
            title: row.title,
            description: row.description,
            category_id: CategoryId::from_i64(row.category_id),
            image_id: row.image_id.map(ImageId::from_i64),
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    title: Option<String>,
    path: String,
    url: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Image {
            id: ImageId::from_i64(row.id),
            title: row.title,
            path: row.path,
            url: row.url,
            updated_at: row.updated_at,
        }
    }
}
