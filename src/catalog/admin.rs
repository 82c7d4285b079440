use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CategoryInput, SubCategoryFilter, SubCategoryInput},
    repo,
    repo_types::{Category, SubCategory},
};
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/api/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/admin/api/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route(
            "/admin/api/sub-categories",
            get(list_sub_categories).post(create_sub_category),
        )
        .route(
            "/admin/api/sub-categories/:id",
            put(update_sub_category).delete(delete_sub_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(repo::list_all_categories(&state.db).await?))
}

#[instrument(skip(state, body))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let fields = body.validate()?;
    let category = repo::insert_category(&state.db, &fields).await?;
    info!(id = %category.id, slug = %category.slug, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, body))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryInput>,
) -> ApiResult<Json<Category>> {
    let fields = body.validate()?;
    let category = repo::update_category(&state.db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))?;
    info!(%id, "category updated");
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete_category(&state.db, id).await? {
        return Err(ApiError::NotFound("Category not found".into()));
    }
    info!(%id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    Query(filter): Query<SubCategoryFilter>,
) -> ApiResult<Json<Vec<SubCategory>>> {
    Ok(Json(
        repo::list_all_sub_categories(&state.db, filter.category_id).await?,
    ))
}

#[instrument(skip(state, body))]
pub async fn create_sub_category(
    State(state): State<AppState>,
    Json(body): Json<SubCategoryInput>,
) -> ApiResult<(StatusCode, Json<SubCategory>)> {
    let fields = body.validate()?;
    let sub = repo::insert_sub_category(&state.db, &fields).await?;
    info!(id = %sub.id, category_id = %sub.category_id, "sub-category created");
    Ok((StatusCode::CREATED, Json(sub)))
}

#[instrument(skip(state, body))]
pub async fn update_sub_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubCategoryInput>,
) -> ApiResult<Json<SubCategory>> {
    let fields = body.validate()?;
    let sub = repo::update_sub_category(&state.db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sub-category not found".into()))?;
    info!(%id, "sub-category updated");
    Ok(Json(sub))
}

#[instrument(skip(state))]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete_sub_category(&state.db, id).await? {
        return Err(ApiError::NotFound("Sub-category not found".into()));
    }
    info!(%id, "sub-category deleted");
    Ok(StatusCode::NO_CONTENT)
}
