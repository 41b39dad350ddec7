//! User entity model and DTOs.

use librairie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role_id: DbId,
    /// Resolved role name (e.g. `"ADMIN"`, `"BUYER"`).
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}

/// DTO for a user editing their own profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    pub surname: String,
    pub email: String,
}
