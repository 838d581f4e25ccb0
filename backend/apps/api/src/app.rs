//! Router Composition
//!
//! The whole application lives under the catalog base path. The session is
//! resolved once per request by the outermost middleware; protected catalog
//! routes are gated before their handlers run.

use std::path::Path;

use auth::{AuthAppState, AuthConfig, auth_router, require_login, resolve_session};
use auth::domain::repository::UserRepository;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::get;
use catalog::domain::fetcher::AssetFetcher;
use catalog::domain::repository::CatalogStore;
use catalog::{CatalogAppState, catalog_protected_router, catalog_public_router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_router<U, C, F>(
    users: U,
    auth_config: AuthConfig,
    catalog: CatalogAppState<C, F>,
    images_dir: &Path,
) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let auth_state = AuthAppState::new(users, auth_config);
    let login_gate = from_fn_with_state(auth_state.config.clone(), require_login);

    let home = catalog.config.home_url();
    let images_route = catalog.config.images_route();

    Router::new()
        .route(
            "/",
            get(move || {
                let home = home.clone();
                async move { Redirect::to(&home) }
            }),
        )
        .merge(auth_router(auth_state.clone()))
        .merge(catalog_public_router(catalog.clone()))
        .merge(catalog_protected_router(catalog).route_layer(login_gate))
        .nest_service(&images_route, ServeDir::new(images_dir))
        .layer(from_fn_with_state(auth_state, resolve_session::<U>))
        .layer(TraceLayer::new_for_http())
}
