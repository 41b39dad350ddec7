//! Handlers for the `/user` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::roles::ROLE_ADMIN;
use librairie_core::types::DbId;
use librairie_core::upload::UploadKind;
use librairie_core::validation::not_blank;
use librairie_db::models::role::Role;
use librairie_db::models::user::{UpdateProfile, UserResponse};
use librairie_db::repositories::{BookRepo, RoleRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use super::auth::{create_account, normalized_email, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `PUT /user/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub surname: String,
    #[serde(default, deserialize_with = "normalized_email")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// GET /api/user
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok("Users retrieved", users)))
}

/// POST /api/user/add-admin
pub async fn add_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = create_account(&state, &input, ROLE_ADMIN).await?;
    tracing::info!(created_by = admin.user_id, user_id = user.id, "Administrator added");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Administrator created", user)),
    ))
}

/// DELETE /api/user/delete/{id}
///
/// Books, seller requests and transactions of the user are removed with it;
/// the user's stored book files are cleaned up afterwards.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Administrators cannot delete their own account".into(),
        )));
    }

    let books = BookRepo::list_by_user(&state.pool, id).await?;
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    for row in &books {
        state.uploads.remove(UploadKind::Image, &row.book.image).await;
        state.uploads.remove(UploadKind::Pdf, &row.book.pdf).await;
    }
    tracing::info!(deleted_by = admin.user_id, user_id = id, books = books.len(), "User deleted");
    Ok(Json(MessageResponse::message("User deleted")))
}

/// PUT /api/user/profile
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let email = input.email;
    if UserRepo::email_taken(&state.pool, &email, Some(auth.user_id)).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already in use".into(),
        )));
    }

    let update = UpdateProfile {
        name: input.name.trim().to_string(),
        surname: input.surname.trim().to_string(),
        email,
    };
    UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let profile = UserRepo::find_response_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(ApiResponse::ok("Profile updated", profile)))
}

/// GET /api/user/role
///
/// The caller's current role, read from the database rather than the token.
pub async fn my_role(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })
    };
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(not_found)?;
    let role = RoleRepo::find_by_id(&state.pool, user.role_id)
        .await?
        .ok_or_else(|| CoreError::Internal(format!("Role {} missing", user.role_id)))?;
    Ok(Json(ApiResponse::ok("Role retrieved", role)))
}
