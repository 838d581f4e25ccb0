//! API DTOs (Data Transfer Objects)
//!
//! Form bodies come in as `application/x-www-form-urlencoded`; pages go out
//! as JSON view bags (`view` + `user` + page data).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::{CatalogConfig, CategoryEntry, ItemEntry};
use crate::domain::entity::{category::Category, image::Image, item::Item};

/// Field name → validation marker
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Empty form fields count as omitted
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Split `items` into rows of `columns`
pub fn rows<T>(items: Vec<T>, columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut rows = Vec::with_capacity(items.len().div_ceil(columns));
    let mut row = Vec::with_capacity(columns);
    for item in items {
        row.push(item);
        if row.len() == columns {
            rows.push(std::mem::replace(&mut row, Vec::with_capacity(columns)));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

// ============================================================================
// Forms & queries
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    pub item_title: Option<String>,
    pub item_desc: Option<String>,
    pub img_url: Option<String>,
    pub category_id: Option<String>,
}

// ============================================================================
// Summaries
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub datetime: String,
}

impl CategorySummary {
    pub fn new(category: &Category, config: &CatalogConfig) -> Self {
        let entry = CategoryEntry::from(category);
        Self {
            id: entry.id,
            name: entry.name,
            url: config.category_url(category.id),
            datetime: entry.datetime,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub url: String,
}

impl ItemSummary {
    pub fn new(item: &Item, config: &CatalogConfig) -> Self {
        Self {
            id: item.id.as_i64(),
            title: item.title.clone(),
            category_id: item.category_id.as_i64(),
            url: config.item_url(item.category_id, item.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub title: Option<String>,
    pub src: String,
    pub url: Option<String>,
}

impl ImageView {
    pub fn new(image: &Image, config: &CatalogConfig) -> Self {
        Self {
            id: image.id.as_i64(),
            title: image.title.clone(),
            src: image.src(&config.base_path),
            url: image.url.clone(),
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub view: &'static str,
    pub user: Option<String>,
    pub categories: Vec<CategorySummary>,
    pub latest_rows: Vec<Vec<ItemSummary>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPageView {
    pub view: &'static str,
    pub user: Option<String>,
    pub category: CategorySummary,
    pub item_rows: Vec<Vec<ItemSummary>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemPageView {
    pub view: &'static str,
    pub user: Option<String>,
    pub item: ItemSummary,
    pub description: String,
    pub datetime: String,
    pub category: CategorySummary,
    pub image: Option<ImageView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub view: &'static str,
    pub user: Option<String>,
    pub query: String,
    pub item: Option<ItemSummary>,
    pub category: Option<CategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryFormView {
    pub view: &'static str,
    pub user: Option<String>,
    pub category: Option<CategorySummary>,
    pub category_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemFormView {
    pub view: &'static str,
    pub user: Option<String>,
    pub category: CategorySummary,
    pub categories: Vec<CategorySummary>,
    pub item: Option<ItemSummary>,
    pub item_title: String,
    pub item_desc: String,
    pub img_url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDeletedView {
    pub view: &'static str,
    pub user: Option<String>,
    pub deleted_category_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemDeletedView {
    pub view: &'static str,
    pub user: Option<String>,
    pub deleted_item_title: String,
}

// ============================================================================
// Feeds
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesFeed {
    #[serde(rename = "Categories")]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemsFeed {
    #[serde(rename = "Items")]
    pub items: Vec<ItemEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemFeed {
    #[serde(rename = "Item")]
    pub item: ItemEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        assert_eq!(rows((1..=7).collect(), 3), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(rows((1..=4).collect(), 4), vec![vec![1, 2, 3, 4]]);
        assert!(rows(Vec::<i32>::new(), 4).is_empty());
        assert_eq!(rows(vec![1, 2], 0), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
    }
}
