//! Infrastructure Layer
//!
//! Database implementations and the HTTP image fetcher.

pub mod http_fetcher;
pub mod memory;
pub mod postgres;

pub use http_fetcher::HttpAssetFetcher;
pub use memory::MemoryCatalogRepository;
pub use postgres::PgCatalogRepository;
