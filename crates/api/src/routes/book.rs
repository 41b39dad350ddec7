use axum::routing::get;
use axum::Router;

use crate::handlers::book;
use crate::state::AppState;

/// Routes mounted at `/book`.
///
/// ```text
/// GET    /                        -> list_books
/// POST   /                        -> create_book (seller/admin, multipart)
/// GET    /search                  -> search_books
/// GET    /user/me                 -> my_books
/// GET    /category/{category_id}  -> books_by_category
/// GET    /{id}                    -> get_book
/// PUT    /{id}                    -> update_book (owner)
/// DELETE /{id}                    -> delete_book (owner/admin)
/// GET    /{id}/download           -> download_book
/// GET    /{id}/image              -> book_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(book::list_books).post(book::create_book))
        .route("/search", get(book::search_books))
        .route("/user/me", get(book::my_books))
        .route("/category/{category_id}", get(book::books_by_category))
        .route(
            "/{id}",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/{id}/download", get(book::download_book))
        .route("/{id}/image", get(book::book_image))
}
