//! Handlers for the `/category` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::types::DbId;
use librairie_core::validation::not_blank;
use librairie_db::models::category::{Category, CategoryWithBooks};
use librairie_db::repositories::{BookRepo, CategoryRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// GET /api/category
pub async fn list_categories(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryWithBooks>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let books = BookRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::ok(
        "Categories retrieved",
        CategoryWithBooks::group(categories, books),
    )))
}

/// POST /api/category
pub async fn create_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let name = input.name.trim();
    if CategoryRepo::find_by_name(&state.pool, name).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category '{name}' already exists"
        ))));
    }

    let category = CategoryRepo::create(&state.pool, name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Category created", category)),
    ))
}

/// PUT /api/category/{id}
pub async fn update_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let name = input.name.trim();
    if let Some(existing) = CategoryRepo::find_by_name(&state.pool, name).await? {
        if existing.id != id {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Category '{name}' already exists"
            ))));
        }
    }

    let category = CategoryRepo::update(&state.pool, id, name)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::ok("Category updated", category)))
}

/// DELETE /api/category/{id}
///
/// Refused while books are still filed under the category.
pub async fn delete_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !BookRepo::list_by_category(&state.pool, id).await?.is_empty() {
        return Err(AppError::Core(CoreError::Conflict(
            "Category still has books".into(),
        )));
    }

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::message("Category deleted")))
}
