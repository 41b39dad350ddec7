//! Startup tasks that seed data the application cannot run without.

use librairie_core::error::CoreError;
use librairie_core::roles::ROLE_ADMIN;
use librairie_core::validation::{validate_password_strength, MIN_PASSWORD_LENGTH};
use librairie_db::models::user::CreateUser;
use librairie_db::repositories::{RoleRepo, UserRepo};
use librairie_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// The initial administrator account, configured through the environment.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
    pub surname: String,
}

impl AdminSeed {
    /// | Env Var          | Required | Default  |
    /// |------------------|----------|----------|
    /// | `ADMIN_EMAIL`    | yes      |          |
    /// | `ADMIN_PASSWORD` | yes      |          |
    /// | `ADMIN_NAME`     | no       | `Admin`  |
    /// | `ADMIN_SURNAME`  | no       | `Admin`  |
    ///
    /// Returns `None` unless both email and password are set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok()?;
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        Some(Self {
            email: email.trim().to_lowercase(),
            password,
            name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into()),
            surname: std::env::var("ADMIN_SURNAME").unwrap_or_else(|_| "Admin".into()),
        })
    }
}

/// Create the seed administrator unless a user with that email exists.
///
/// Returns `true` if an account was created.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<bool> {
    if UserRepo::find_by_email(pool, &seed.email).await?.is_some() {
        return Ok(false);
    }
    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH)?;

    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| CoreError::Internal("ADMIN role is not seeded".into()))?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin = UserRepo::create(
        pool,
        &CreateUser {
            name: seed.name.clone(),
            surname: seed.surname.clone(),
            email: seed.email.clone(),
            password_hash,
            role_id: role.id,
        },
    )
    .await?;
    tracing::info!(user_id = admin.id, email = %admin.email, "Seed administrator created");
    Ok(true)
}
