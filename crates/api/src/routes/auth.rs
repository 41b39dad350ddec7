//! Account routes, mounted directly under `/api`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /register         -> register
/// POST /login            -> login
/// PUT  /change-password  -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/change-password", put(auth::change_password))
}
