//! Handlers for account creation, login and password changes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::roles::ROLE_BUYER;
use librairie_core::validation::{not_blank, validate_password_strength, MIN_PASSWORD_LENGTH};
use librairie_db::models::user::{CreateUser, UserResponse};
use librairie_db::repositories::{RoleRepo, UserRepo};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register` and `POST /user/add-admin`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub surname: String,
    #[serde(default, deserialize_with = "normalized_email")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "normalized_email")]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Request body for `PUT /change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub old_password: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub new_password: String,
}

/// Successful authentication payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserResponse,
    pub role: String,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/register
///
/// Create a `BUYER` account and log it in.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let user = create_account(&state, &input, ROLE_BUYER).await?;
    let payload = auth_payload(&state, user)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Account created", payload)),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let profile = UserRepo::find_response_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(invalid)?;
    tracing::info!(user_id = profile.id, role = %profile.role, "User logged in");

    Ok(Json(ApiResponse::ok(
        "Login successful",
        auth_payload(&state, profile)?,
    )))
}

/// PUT /api/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::BadRequest("Old password is incorrect".into()));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)?;
    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(MessageResponse::message("Password updated")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Emails are compared and stored trimmed and lowercased, so the
/// normalized form is what validation sees.
pub(crate) fn normalized_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_lowercase())
}

/// Validate, hash and insert a new account with the given role.
pub(crate) async fn create_account(
    state: &AppState,
    input: &RegisterRequest,
    role_name: &str,
) -> AppResult<UserResponse> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)?;

    let email = input.email.clone();
    if UserRepo::email_taken(&state.pool, &email, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already in use".into(),
        )));
    }

    let role = RoleRepo::find_by_name(&state.pool, role_name)
        .await?
        .ok_or_else(|| CoreError::Internal(format!("{role_name} role is not seeded")))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            surname: input.surname.trim().to_string(),
            email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, role = role_name, "Account created");

    UserRepo::find_response_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))
}

fn auth_payload(state: &AppState, user: UserResponse) -> AppResult<AuthPayload> {
    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthPayload {
        role: user.role.clone(),
        user,
        token,
    })
}
