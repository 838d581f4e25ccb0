//! Title search
//!
//! Exact, case-sensitive title match. The first hit wins.

use crate::domain::entity::{category::Category, item::Item};
use crate::domain::repository::{CategoryRepository, ItemRepository};
use crate::error::CatalogResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub item: Option<Item>,
    pub category: Option<Category>,
}

pub async fn search<R>(repo: &R, query: &str) -> CatalogResult<SearchResult>
where
    R: CategoryRepository + ItemRepository + Sync,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResult::default());
    }

    let Some(item) = repo.find_item_by_title(query).await? else {
        tracing::debug!(query, "Search found nothing");
        return Ok(SearchResult::default());
    };

    let category = repo.find_category(item.category_id).await?;
    Ok(SearchResult {
        item: Some(item),
        category,
    })
}
