//! Image Service
//!
//! Image rows are only ever created once a local file exists.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::ImageId;

use crate::domain::entity::image::{Image, ImageChanges, NewImage};
use crate::domain::fetcher::AssetFetcher;
use crate::domain::repository::ImageRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct ImageService<R, F>
where
    R: ImageRepository,
    F: AssetFetcher,
{
    repo: Arc<R>,
    fetcher: Arc<F>,
}

impl<R, F> ImageService<R, F>
where
    R: ImageRepository + Sync,
    F: AssetFetcher + Sync,
{
    pub fn new(repo: Arc<R>, fetcher: Arc<F>) -> Self {
        Self { repo, fetcher }
    }

    /// Create an image row
    ///
    /// A supplied URL is downloaded first and its local copy wins over
    /// `path`. Returns `None` (and writes nothing) when no local file can be
    /// had.
    pub async fn store(
        &self,
        title: Option<String>,
        path: Option<String>,
        url: Option<String>,
    ) -> CatalogResult<Option<Image>> {
        let fetched = match url.as_deref() {
            Some(url) => self.fetcher.fetch(url).await,
            None => None,
        };

        let Some(path) = fetched.or(path) else {
            tracing::debug!(url = ?url, "No local file for image; nothing stored");
            return Ok(None);
        };

        let image = self.repo.insert_image(NewImage { title, path, url }).await?;
        tracing::info!(image_id = %image.id, path = %image.path, "Image stored");

        Ok(Some(image))
    }

    pub async fn get(&self, id: ImageId) -> CatalogResult<Image> {
        self.repo
            .find_image(id)
            .await?
            .ok_or(CatalogError::ImageNotFound(id))
    }

    /// Follow an item's loose image reference; a dangling id is `None`
    pub async fn resolve(&self, id: Option<ImageId>) -> CatalogResult<Option<Image>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let image = self.repo.find_image(id).await?;
        if image.is_none() {
            tracing::debug!(image_id = %id, "Dangling image reference");
        }
        Ok(image)
    }

    /// Replace title/path/url; a supplied path drops a supplied URL
    pub async fn update(&self, id: ImageId, changes: ImageChanges) -> CatalogResult<Image> {
        let mut image = self.get(id).await?;
        image.update(changes, Utc::now());
        self.repo.update_image(&image).await?;

        Ok(image)
    }

    /// Download `url` and point the image at the new local copy
    ///
    /// Returns `None` and leaves the row untouched if the download fails.
    pub async fn refresh_from_url(&self, id: ImageId, url: &str) -> CatalogResult<Option<Image>> {
        let mut image = self.get(id).await?;

        let Some(path) = self.fetcher.fetch(url).await else {
            return Ok(None);
        };

        image.path = path;
        image.url = Some(url.to_string());
        image.updated_at = Utc::now();
        self.repo.update_image(&image).await?;

        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryCatalogRepository;
    use crate::test_support::StubFetcher;

    fn service(fetcher: StubFetcher) -> (ImageService<MemoryCatalogRepository, StubFetcher>, MemoryCatalogRepository) {
        let repo = MemoryCatalogRepository::new();
        (
            ImageService::new(Arc::new(repo.clone()), Arc::new(fetcher)),
            repo,
        )
    }

    #[tokio::test]
    async fn test_store_fetches_url() {
        let (images, _) = service(StubFetcher::serving("/static/images/board.jpg"));

        let image = images
            .store(None, None, Some("http://example.com/board.jpg".into()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(image.path, "/static/images/board.jpg");
        assert_eq!(image.url.as_deref(), Some("http://example.com/board.jpg"));
        assert_eq!(image.src("/catalog"), "/catalog/static/images/board.jpg");
    }

    #[tokio::test]
    async fn test_store_without_local_file_writes_nothing() {
        let (images, _) = service(StubFetcher::failing());

        let stored = images
            .store(Some("t".into()), None, Some("http://example.com/x.jpg".into()))
            .await
            .unwrap();
        assert!(stored.is_none());

        let none = images.store(None, None, None).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_store_with_local_path_only() {
        let (images, _) = service(StubFetcher::failing());
        let image = images
            .store(Some("Logo".into()), Some("/static/images/logo.png".into()), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.path, "/static/images/logo.png");
        assert_eq!(image.url, None);
    }

    #[tokio::test]
    async fn test_resolve_dangling_reference() {
        let (images, repo) = service(StubFetcher::serving("/static/images/a.jpg"));
        let image = images
            .store(None, None, Some("http://example.com/a.jpg".into()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(images.resolve(Some(image.id)).await.unwrap(), Some(image.clone()));
        assert!(repo.remove_image(image.id).unwrap());
        assert_eq!(images.resolve(Some(image.id)).await.unwrap(), None);
        assert_eq!(images.resolve(None).await.unwrap(), None);
        assert!(images.get(image.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_drops_url_when_path_given() {
        let (images, _) = service(StubFetcher::serving("/static/images/a.jpg"));
        let image = images
            .store(None, None, Some("http://example.com/a.jpg".into()))
            .await
            .unwrap()
            .unwrap();

        let updated = images
            .update(
                image.id,
                ImageChanges {
                    title: None,
                    path: Some("/static/images/b.jpg".into()),
                    url: Some("http://example.com/b.jpg".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.path, "/static/images/b.jpg");
        assert_eq!(updated.url, None);
        assert!(updated.updated_at >= image.updated_at);
        assert_eq!(images.get(image.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_row() {
        let (images, repo) = service(StubFetcher::serving("/static/images/a.jpg"));
        let image = images
            .store(None, None, Some("http://example.com/a.jpg".into()))
            .await
            .unwrap()
            .unwrap();

        let failing = ImageService::new(Arc::new(repo), Arc::new(StubFetcher::failing()));
        let refreshed = failing
            .refresh_from_url(image.id, "http://example.com/c.jpg")
            .await
            .unwrap();

        assert!(refreshed.is_none());
        assert_eq!(failing.get(image.id).await.unwrap(), image);
    }
}
