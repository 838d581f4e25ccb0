//! Catalog Router
//!
//! Two routers over one state: pages and feeds anyone may read, and the
//! mutations the binary mounts behind the login gate.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::domain::fetcher::AssetFetcher;
use crate::domain::repository::CatalogStore;
use crate::presentation::handlers::{self, CatalogAppState};

/// Read-only pages and feeds
pub fn catalog_public_router<R, F>(state: CatalogAppState<R, F>) -> Router
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let base = state.config.base_path.clone();

    Router::new()
        .route(&format!("{base}/"), get(handlers::home::<R, F>))
        .route(&format!("{base}/search"), get(handlers::search_page::<R, F>))
        .route(&format!("{base}/json"), get(handlers::categories_json::<R, F>))
        .route(&format!("{base}/xml"), get(handlers::catalog_xml::<R, F>))
        .route(
            &format!("{base}/categories/{{category_id}}/"),
            get(handlers::category_page::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/json"),
            get(handlers::category_items_json::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/items/{{item_id}}"),
            get(handlers::item_page::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/items/{{item_id}}/json"),
            get(handlers::item_json::<R, F>),
        )
        .with_state(state)
}

/// Category and item mutations; callers must add the login gate
pub fn catalog_protected_router<R, F>(state: CatalogAppState<R, F>) -> Router
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let base = state.config.base_path.clone();

    Router::new()
        .route(
            &format!("{base}/categories/new"),
            get(handlers::new_category_form).post(handlers::create_category::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/edit/"),
            get(handlers::edit_category_form::<R, F>).post(handlers::rename_category::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}"),
            delete(handlers::delete_category::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/items/new"),
            get(handlers::new_item_form::<R, F>).post(handlers::create_item::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/items/{{item_id}}/edit"),
            get(handlers::edit_item_form::<R, F>).post(handlers::update_item::<R, F>),
        )
        .route(
            &format!("{base}/categories/{{category_id}}/items/{{item_id}}/delete"),
            post(handlers::delete_item::<R, F>),
        )
        .with_state(state)
}
