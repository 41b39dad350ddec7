use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /              -> list_users (admin)
/// POST   /add-admin     -> add_admin (admin)
/// DELETE /delete/{id}   -> delete_user (admin)
/// PUT    /profile       -> update_profile
/// GET    /role          -> my_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users))
        .route("/add-admin", post(user::add_admin))
        .route("/delete/{id}", delete(user::delete_user))
        .route("/profile", put(user::update_profile))
        .route("/role", get(user::my_role))
}
