use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::seller_request;
use crate::state::AppState;

/// Routes mounted at `/request`.
///
/// ```text
/// GET    /               -> list_requests (admin)
/// POST   /               -> create_request
/// PUT    /{id}/confirm   -> confirm_request (admin)
/// PUT    /{id}/refuse    -> refuse_request (admin)
/// DELETE /{id}           -> delete_request (applicant/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(seller_request::list_requests).post(seller_request::create_request),
        )
        .route("/{id}/confirm", put(seller_request::confirm_request))
        .route("/{id}/refuse", put(seller_request::refuse_request))
        .route("/{id}", delete(seller_request::delete_request))
}
