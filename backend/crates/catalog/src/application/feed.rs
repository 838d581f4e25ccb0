//! JSON / XML feeds

use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use kernel::id::{CategoryId, ItemId};
use serde::Serialize;

use crate::domain::entity::{category::Category, image::Image, item::Item};
use crate::domain::repository::CatalogStore;
use crate::error::{CatalogError, CatalogResult};

/// RFC 3339, whole seconds, `Z` suffix
pub(crate) fn feed_datetime(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub id: i64,
    pub name: String,
    pub datetime: String,
}

impl From<&Category> for CategoryEntry {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_i64(),
            name: category.name.clone(),
            datetime: feed_datetime(category.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemEntry {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Category name
    pub category: String,
    pub image_url: Option<String>,
    pub datetime: String,
}

impl ItemEntry {
    fn new(item: &Item, category: &Category, image: Option<&Image>, url_prefix: &str) -> Self {
        Self {
            id: item.id.as_i64(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: category.name.clone(),
            image_url: image.map(|i| i.src(url_prefix)),
            datetime: feed_datetime(item.updated_at),
        }
    }
}

pub struct FeedService<R: CatalogStore> {
    repo: Arc<R>,
    url_prefix: String,
}

impl<R: CatalogStore> FeedService<R> {
    /// `url_prefix` is prepended to local image paths
    pub fn new(repo: Arc<R>, url_prefix: impl Into<String>) -> Self {
        Self {
            repo,
            url_prefix: url_prefix.into(),
        }
    }

    pub async fn categories(&self) -> CatalogResult<Vec<CategoryEntry>> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.iter().map(CategoryEntry::from).collect())
    }

    pub async fn category_items(&self, id: CategoryId) -> CatalogResult<Vec<ItemEntry>> {
        let category = self
            .repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let items = self.repo.list_items_by_category(id).await?;
        let mut entries = Vec::with_capacity(items.len());
        for item in &items {
            let image = self.image_of(item).await?;
            entries.push(ItemEntry::new(item, &category, image.as_ref(), &self.url_prefix));
        }

        Ok(entries)
    }

    pub async fn item(&self, category_id: CategoryId, id: ItemId) -> CatalogResult<ItemEntry> {
        let item = self
            .repo
            .find_item(id)
            .await?
            .filter(|i| i.category_id == category_id)
            .ok_or(CatalogError::ItemNotFound(id))?;

        let category = self
            .repo
            .find_category(category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))?;

        let image = self.image_of(&item).await?;
        Ok(ItemEntry::new(&item, &category, image.as_ref(), &self.url_prefix))
    }

    /// Category listing as an XML document
    pub async fn catalog_xml(&self) -> CatalogResult<String> {
        let entries = self.categories().await?;

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<catalog>\n");
        for entry in &entries {
            // writing into a String cannot fail
            let _ = writeln!(
                xml,
                "  <category id=\"{}\">\n    <name>{}</name>\n    <datetime>{}</datetime>\n  </category>",
                entry.id,
                escape_xml(&entry.name),
                escape_xml(&entry.datetime),
            );
        }
        xml.push_str("</catalog>\n");

        Ok(xml)
    }

    async fn image_of(&self, item: &Item) -> CatalogResult<Option<Image>> {
        match item.image_id {
            Some(id) => self.repo.find_image(id).await,
            None => Ok(None),
        }
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            // Not representable in XML 1.0, even as a character reference
            _ if c < ' ' || matches!(c, '\u{FFFE}' | '\u{FFFF}') => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::entity::{category::CategoryName, image::NewImage, item::NewItem};
    use crate::domain::repository::{CategoryRepository, ImageRepository, ItemRepository};
    use crate::infra::memory::MemoryCatalogRepository;

    async fn seeded() -> (MemoryCatalogRepository, Category, Item) {
        let repo = MemoryCatalogRepository::new();
        let cat = repo
            .insert_category(&CategoryName::new("Rock & Roll").unwrap())
            .await
            .unwrap();
        let image = repo
            .insert_image(NewImage {
                title: None,
                path: "/static/images/amp.jpg".into(),
                url: Some("http://example.com/amp.jpg".into()),
            })
            .await
            .unwrap();
        let item = repo
            .insert_item(NewItem {
                title: "Amp".into(),
                description: "Loud".into(),
                category_id: cat.id,
                image_id: Some(image.id),
            })
            .await
            .unwrap();
        (repo, cat, item)
    }

    #[test]
    fn test_datetime_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(feed_datetime(at), "2024-03-01T12:30:05Z");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(escape_xml("a\u{1}b\u{1f}c\u{fffe}"), "abc");
        assert_eq!(escape_xml("tab\there\nnext"), "tab\there\nnext");
    }

    #[tokio::test]
    async fn test_category_and_item_entries() {
        let (repo, cat, item) = seeded().await;
        let feed = FeedService::new(Arc::new(repo), "/catalog");

        let categories = feed.categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Rock & Roll");
        assert_eq!(categories[0].id, cat.id.as_i64());

        let items = feed.category_items(cat.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Rock & Roll");
        assert_eq!(
            items[0].image_url.as_deref(),
            Some("/catalog/static/images/amp.jpg")
        );

        let single = feed.item(cat.id, item.id).await.unwrap();
        assert_eq!(single, items[0]);

        let json = serde_json::to_value(&single).unwrap();
        assert_eq!(json["title"], "Amp");
        assert_eq!(json["description"], "Loud");
    }

    #[tokio::test]
    async fn test_dangling_image_is_null() {
        let (repo, cat, item) = seeded().await;
        repo.remove_image(item.image_id.unwrap()).unwrap();
        let feed = FeedService::new(Arc::new(repo), "/catalog");

        let entry = feed.item(cat.id, item.id).await.unwrap();
        assert_eq!(entry.image_url, None);
        assert!(serde_json::to_value(&entry).unwrap()["image_url"].is_null());
    }

    #[tokio::test]
    async fn test_not_found() {
        let (repo, cat, item) = seeded().await;
        let feed = FeedService::new(Arc::new(repo), "/catalog");

        assert!(
            feed.category_items(CategoryId::from_i64(999))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            feed.item(CategoryId::from_i64(999), item.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            feed.item(cat.id, ItemId::from_i64(999))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_catalog_xml_escapes() {
        let (repo, cat, _) = seeded().await;
        let feed = FeedService::new(Arc::new(repo), "/catalog");

        let xml = feed.catalog_xml().await.unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(&format!("<category id=\"{}\">", cat.id.as_i64())));
        assert!(xml.contains("<name>Rock &amp; Roll</name>"));
        assert!(xml.trim_end().ends_with("</catalog>"));
    }

    #[tokio::test]
    async fn test_catalog_xml_drops_control_characters() {
        let repo = MemoryCatalogRepository::new();
        repo.insert_category(&CategoryName::new("Bell\u{7}s").unwrap())
            .await
            .unwrap();
        let feed = FeedService::new(Arc::new(repo), "/catalog");

        let xml = feed.catalog_xml().await.unwrap();
        assert!(xml.contains("<name>Bells</name>"));
        assert!(!xml.contains('\u{7}'));
    }
}
