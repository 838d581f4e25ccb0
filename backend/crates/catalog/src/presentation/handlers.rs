//! HTTP Handlers
//!
//! Mutating handlers are mounted behind the login gate by the binary; they
//! never look at the session themselves beyond the display name.

use std::sync::Arc;

use axum::Form;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::id::{CategoryId, ItemId};
use kernel::session::SessionState;

use crate::application::{
    CatalogConfig, CategoryService, CreateItem, EditItem, FeedService, ItemService, search,
};
use crate::domain::entity::{category::Category, item::Item};
use crate::domain::fetcher::AssetFetcher;
use crate::domain::repository::CatalogStore;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{
    CategoriesFeed, CategoryDeletedView, CategoryForm, CategoryFormView, CategoryPageView,
    CategorySummary, FieldErrors, HomeView, ImageView, ItemDeletedView, ItemFeed, ItemForm,
    ItemFormView, ItemPageView, ItemSummary, ItemsFeed, SearchQuery, SearchView, non_empty,
    rows,
};

pub const CATEGORY_ID_FIELD: &str = "category_id";
pub const INVALID_CATEGORY: &str = "Invalid Category";

/// Shared state for catalog handlers
pub struct CatalogAppState<R, F>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub fetcher: Arc<F>,
    pub config: Arc<CatalogConfig>,
}

impl<R, F> Clone for CatalogAppState<R, F>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            fetcher: self.fetcher.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, F> CatalogAppState<R, F>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    pub fn new(repo: R, fetcher: F, config: CatalogConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        }
    }

    pub fn categories(&self) -> CategoryService<R> {
        CategoryService::new(self.repo.clone())
    }

    pub fn items(&self) -> ItemService<R, F> {
        ItemService::new(self.repo.clone(), self.fetcher.clone())
    }

    pub fn feeds(&self) -> FeedService<R> {
        FeedService::new(self.repo.clone(), self.config.base_path.clone())
    }

    fn category_summary(&self, category: &Category) -> CategorySummary {
        CategorySummary::new(category, &self.config)
    }

    fn item_summary(&self, item: &Item) -> ItemSummary {
        ItemSummary::new(item, &self.config)
    }

    async fn all_category_summaries(&self) -> CatalogResult<Vec<CategorySummary>> {
        let categories = self.categories().list().await?;
        Ok(categories.iter().map(|c| self.category_summary(c)).collect())
    }
}

fn display_name(session: &SessionState) -> Option<String> {
    session.user_name().map(str::to_string)
}

fn single_error(field: &'static str, message: &'static str) -> FieldErrors {
    FieldErrors::from([(field, message)])
}

fn parse_category_id(raw: Option<String>) -> CatalogResult<Option<CategoryId>> {
    non_empty(raw)
        .map(|raw| {
            raw.trim()
                .parse::<CategoryId>()
                .map_err(|_| CatalogError::validation(CATEGORY_ID_FIELD, INVALID_CATEGORY))
        })
        .transpose()
}

// ============================================================================
// Pages
// ============================================================================

/// GET /catalog/
pub async fn home<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
) -> CatalogResult<Json<HomeView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let categories = state.all_category_summaries().await?;
    let latest = state.items().latest(state.config.latest_limit).await?;
    let latest = latest.iter().map(|i| state.item_summary(i)).collect();

    Ok(Json(HomeView {
        view: "home",
        user: display_name(&session),
        categories,
        latest_rows: rows(latest, state.config.home_columns),
    }))
}

/// GET /catalog/categories/{category_id}/
pub async fn category_page<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
) -> CatalogResult<Json<CategoryPageView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let service = state.categories();
    let category = service.get(category_id).await?;
    let items = service.items(category_id).await?;
    let items = items.iter().map(|i| state.item_summary(i)).collect();

    Ok(Json(CategoryPageView {
        view: "category",
        user: display_name(&session),
        category: state.category_summary(&category),
        item_rows: rows(items, state.config.category_columns),
    }))
}

/// GET /catalog/categories/{category_id}/items/{item_id}
pub async fn item_page<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path((category_id, item_id)): Path<(CategoryId, ItemId)>,
) -> CatalogResult<Json<ItemPageView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let items = state.items();
    let item = items.get_in_category(category_id, item_id).await?;
    let category = state.categories().get(category_id).await?;
    let image = items.image_of(&item).await?;

    Ok(Json(ItemPageView {
        view: "item",
        user: display_name(&session),
        item: state.item_summary(&item),
        description: item.description.clone(),
        datetime: crate::application::feed::feed_datetime(item.updated_at),
        category: state.category_summary(&category),
        image: image.as_ref().map(|i| ImageView::new(i, &state.config)),
    }))
}

/// GET /catalog/search?q=
pub async fn search_page<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Query(query): Query<SearchQuery>,
) -> CatalogResult<Json<SearchView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let query = query.q.unwrap_or_default();
    let found = search(state.repo.as_ref(), &query).await?;

    Ok(Json(SearchView {
        view: "search",
        user: display_name(&session),
        query,
        item: found.item.as_ref().map(|i| state.item_summary(i)),
        category: found.category.as_ref().map(|c| state.category_summary(c)),
    }))
}

// ============================================================================
// Feeds
// ============================================================================

/// GET /catalog/json
pub async fn categories_json<R, F>(
    State(state): State<CatalogAppState<R, F>>,
) -> CatalogResult<Json<CategoriesFeed>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    Ok(Json(CategoriesFeed {
        categories: state.feeds().categories().await?,
    }))
}

/// GET /catalog/categories/{category_id}/json
pub async fn category_items_json<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    Path(category_id): Path<CategoryId>,
) -> CatalogResult<Json<ItemsFeed>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    Ok(Json(ItemsFeed {
        items: state.feeds().category_items(category_id).await?,
    }))
}

/// GET /catalog/categories/{category_id}/items/{item_id}/json
pub async fn item_json<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    Path((category_id, item_id)): Path<(CategoryId, ItemId)>,
) -> CatalogResult<Json<ItemFeed>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    Ok(Json(ItemFeed {
        item: state.feeds().item(category_id, item_id).await?,
    }))
}

/// GET /catalog/xml
pub async fn catalog_xml<R, F>(State(state): State<CatalogAppState<R, F>>) -> CatalogResult<Response>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let xml = state.feeds().catalog_xml().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

// ============================================================================
// Categories (login required)
// ============================================================================

/// GET /catalog/categories/new
pub async fn new_category_form(session: SessionState) -> Json<CategoryFormView> {
    Json(CategoryFormView {
        view: "category_new",
        user: display_name(&session),
        category: None,
        category_name: String::new(),
        errors: FieldErrors::new(),
    })
}

/// POST /catalog/categories/new
pub async fn create_category<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Form(form): Form<CategoryForm>,
) -> CatalogResult<Response>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    match state.categories().create(&form.category_name).await {
        Ok(category) => Ok(Redirect::to(&state.config.category_url(category.id)).into_response()),
        Err(CatalogError::Validation { field, message }) => {
            let view = CategoryFormView {
                view: "category_new",
                user: display_name(&session),
                category: None,
                category_name: form.category_name,
                errors: single_error(field, message),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /catalog/categories/{category_id}/edit/
pub async fn edit_category_form<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
) -> CatalogResult<Json<CategoryFormView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let category = state.categories().get(category_id).await?;

    Ok(Json(CategoryFormView {
        view: "category_edit",
        user: display_name(&session),
        category_name: category.name.clone(),
        category: Some(state.category_summary(&category)),
        errors: FieldErrors::new(),
    }))
}

/// POST /catalog/categories/{category_id}/edit/
pub async fn rename_category<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> CatalogResult<Response>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let service = state.categories();
    match service.rename(category_id, &form.category_name).await {
        Ok(category) => Ok(Redirect::to(&state.config.category_url(category.id)).into_response()),
        Err(CatalogError::Validation { field, message }) => {
            let category = service.get(category_id).await?;
            let view = CategoryFormView {
                view: "category_edit",
                user: display_name(&session),
                category: Some(state.category_summary(&category)),
                category_name: form.category_name,
                errors: single_error(field, message),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// DELETE /catalog/categories/{category_id}
pub async fn delete_category<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
) -> CatalogResult<Json<CategoryDeletedView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let category = state.categories().delete(category_id).await?;

    Ok(Json(CategoryDeletedView {
        view: "category_deleted",
        user: display_name(&session),
        deleted_category_name: category.name,
    }))
}

// ============================================================================
// Items (login required)
// ============================================================================

struct ItemFormValues {
    title: String,
    description: String,
    img_url: String,
}

impl ItemFormValues {
    fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            img_url: String::new(),
        }
    }

    fn from_form(form: &ItemForm) -> Self {
        Self {
            title: form.item_title.clone().unwrap_or_default(),
            description: form.item_desc.clone().unwrap_or_default(),
            img_url: form.img_url.clone().unwrap_or_default(),
        }
    }
}

async fn item_form_view<R, F>(
    state: &CatalogAppState<R, F>,
    session: &SessionState,
    view: &'static str,
    category: &Category,
    item: Option<&Item>,
    values: ItemFormValues,
    errors: FieldErrors,
) -> CatalogResult<ItemFormView>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    Ok(ItemFormView {
        view,
        user: display_name(session),
        category: state.category_summary(category),
        categories: state.all_category_summaries().await?,
        item: item.map(|i| state.item_summary(i)),
        item_title: values.title,
        item_desc: values.description,
        img_url: values.img_url,
        errors,
    })
}

/// GET /catalog/categories/{category_id}/items/new
pub async fn new_item_form<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
) -> CatalogResult<Json<ItemFormView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let category = state.categories().get(category_id).await?;
    let values = ItemFormValues::from_form(&ItemForm::default());
    let view = item_form_view(
        &state,
        &session,
        "item_new",
        &category,
        None,
        values,
        FieldErrors::new(),
    )
    .await?;

    Ok(Json(view))
}

/// POST /catalog/categories/{category_id}/items/new
pub async fn create_item<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<ItemForm>,
) -> CatalogResult<Response>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let category = state.categories().get(category_id).await?;
    let values = ItemFormValues::from_form(&form);

    let input = CreateItem {
        title: values.title.clone(),
        description: values.description.clone(),
        category_id,
        image_url: non_empty(form.img_url),
    };

    match state.items().create(input).await {
        Ok(item) => Ok(Redirect::to(&state.config.item_url(item.category_id, item.id)).into_response()),
        Err(CatalogError::Validation { field, message }) => {
            let view = item_form_view(
                &state,
                &session,
                "item_new",
                &category,
                None,
                values,
                single_error(field, message),
            )
            .await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /catalog/categories/{category_id}/items/{item_id}/edit
pub async fn edit_item_form<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path((category_id, item_id)): Path<(CategoryId, ItemId)>,
) -> CatalogResult<Json<ItemFormView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let item = state.items().get_in_category(category_id, item_id).await?;
    let category = state.categories().get(category_id).await?;
    let view = item_form_view(
        &state,
        &session,
        "item_edit",
        &category,
        Some(&item),
        ItemFormValues::from_item(&item),
        FieldErrors::new(),
    )
    .await?;

    Ok(Json(view))
}

/// POST /catalog/categories/{category_id}/items/{item_id}/edit
pub async fn update_item<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path((category_id, item_id)): Path<(CategoryId, ItemId)>,
    Form(form): Form<ItemForm>,
) -> CatalogResult<Response>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let items = state.items();
    let item = items.get_in_category(category_id, item_id).await?;
    let values = ItemFormValues::from_form(&form);

    let result = match parse_category_id(form.category_id) {
        Ok(new_category) => {
            let input = EditItem {
                title: non_empty(form.item_title),
                description: non_empty(form.item_desc),
                category_id: new_category,
                image_url: non_empty(form.img_url),
            };
            items.update(item.id, input).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(item) => Ok(Redirect::to(&state.config.item_url(item.category_id, item.id)).into_response()),
        Err(CatalogError::Validation { field, message }) => {
            let category = state.categories().get(category_id).await?;
            let view = item_form_view(
                &state,
                &session,
                "item_edit",
                &category,
                Some(&item),
                values,
                single_error(field, message),
            )
            .await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /catalog/categories/{category_id}/items/{item_id}/delete
pub async fn delete_item<R, F>(
    State(state): State<CatalogAppState<R, F>>,
    session: SessionState,
    Path((category_id, item_id)): Path<(CategoryId, ItemId)>,
) -> CatalogResult<Json<ItemDeletedView>>
where
    R: CatalogStore,
    F: AssetFetcher + Send + Sync + 'static,
{
    let items = state.items();
    items.get_in_category(category_id, item_id).await?;
    let item = items.delete(item_id).await?;

    Ok(Json(ItemDeletedView {
        view: "item_deleted",
        user: display_name(&session),
        deleted_item_title: item.title,
    }))
}
