//! Well-known role name constants.
//!
//! These must match the seed data in `20260101000001_create_roles_table.sql`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_SELLER: &str = "SELLER";
pub const ROLE_BUYER: &str = "BUYER";

/// Roles allowed to publish books.
pub const PUBLISHING_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SELLER];

/// Whether `role` may upload books to the catalogue.
pub fn can_publish(role: &str) -> bool {
    PUBLISHING_ROLES.contains(&role)
}
