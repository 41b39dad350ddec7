use axum::routing::get;
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payment`.
///
/// ```text
/// GET /             -> list_transactions (admin)
/// GET /me           -> my_transactions
/// GET /callback     -> payment_callback (public, called via the gateway)
/// GET /{book_id}    -> create_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::list_transactions))
        .route("/me", get(payment::my_transactions))
        .route("/callback", get(payment::payment_callback))
        .route("/{book_id}", get(payment::create_payment))
}
