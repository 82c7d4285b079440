use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CategoryPage, ProductPage, SearchQuery, SubCategoryPage, SuperSubCategoryPage},
    repo_types::{Category, Product},
    services::{resolve, Resolved, SlugPath},
};
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

const SEARCH_LIMIT: i64 = 50;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:category", get(get_category))
        .route("/api/catalog/:category/:sub", get(get_sub_category))
        .route("/api/catalog/:category/:sub/:super_sub", get(get_super_sub_category))
        .route(
            "/api/catalog/:category/:sub/:super_sub/:product",
            get(get_product),
        )
        .route("/api/search", get(search))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.categories().await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<CategoryPage>> {
    let path = SlugPath {
        category,
        ..SlugPath::default()
    };
    let resolved = resolve(state.catalog.as_ref(), &path).await?;
    let sub_categories = state.catalog.sub_categories(resolved.category.id).await?;
    Ok(Json(CategoryPage {
        category: resolved.category,
        sub_categories,
    }))
}

#[instrument(skip(state))]
pub async fn get_sub_category(
    State(state): State<AppState>,
    Path((category, sub)): Path<(String, String)>,
) -> ApiResult<Json<SubCategoryPage>> {
    let path = SlugPath {
        category,
        sub_category: Some(sub),
        ..SlugPath::default()
    };
    let Resolved {
        category,
        sub_category,
        ..
    } = resolve(state.catalog.as_ref(), &path).await?;
    let sub_category = sub_category.ok_or_else(missing)?;
    let super_sub_categories = state.catalog.super_sub_categories(sub_category.id).await?;
    Ok(Json(SubCategoryPage {
        category,
        sub_category,
        super_sub_categories,
    }))
}

#[instrument(skip(state))]
pub async fn get_super_sub_category(
    State(state): State<AppState>,
    Path((category, sub, super_sub)): Path<(String, String, String)>,
) -> ApiResult<Json<SuperSubCategoryPage>> {
    let path = SlugPath {
        category,
        sub_category: Some(sub),
        super_sub_category: Some(super_sub),
        product: None,
    };
    let Resolved {
        category,
        sub_category,
        super_sub_category,
        ..
    } = resolve(state.catalog.as_ref(), &path).await?;
    let sub_category = sub_category.ok_or_else(missing)?;
    let super_sub_category = super_sub_category.ok_or_else(missing)?;
    let products = state.catalog.products(super_sub_category.id).await?;
    Ok(Json(SuperSubCategoryPage {
        category,
        sub_category,
        super_sub_category,
        products,
    }))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path((category, sub, super_sub, product)): Path<(String, String, String, String)>,
) -> ApiResult<Json<ProductPage>> {
    let path = SlugPath {
        category,
        sub_category: Some(sub),
        super_sub_category: Some(super_sub),
        product: Some(product),
    };
    let r = resolve(state.catalog.as_ref(), &path).await?;
    Ok(Json(ProductPage {
        category: r.category,
        sub_category: r.sub_category.ok_or_else(missing)?,
        super_sub_category: r.super_sub_category.ok_or_else(missing)?,
        product: r.product.ok_or_else(missing)?,
    }))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let needle = q.q.trim();
    if needle.is_empty() {
        return Err(ApiError::BadRequest("q is required".into()));
    }
    Ok(Json(state.catalog.search_products(needle, SEARCH_LIMIT).await?))
}

// resolve() fills every level it was asked for, so this is unreachable in practice.
fn missing() -> ApiError {
    ApiError::Internal(anyhow::anyhow!("catalog path resolved partially"))
}
