//! Asset Fetcher Seam

/// Downloads a remote image into local storage
#[trait_variant::make(AssetFetcher: Send)]
pub trait LocalAssetFetcher {
    /// Store the resource at `url` locally and return its public path
    /// (e.g. `/static/images/board.jpg`), or `None` if it could not be
    /// retrieved. Failures are logged, never raised.
    async fn fetch(&self, url: &str) -> Option<String>;
}
