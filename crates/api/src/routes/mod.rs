pub mod auth;
pub mod book;
pub mod category;
pub mod health;
pub mod payment;
pub mod seller_request;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                        register (public)
/// /login                           login (public)
/// /change-password                 change password (auth)
///
/// /user                            list users (admin)
/// /user/add-admin                  create administrator (admin)
/// /user/delete/{id}                delete user (admin)
/// /user/profile                    update own profile (auth)
/// /user/role                       own role (auth)
///
/// /category                        list (auth), create (admin)
/// /category/{id}                   rename, delete (admin)
///
/// /book                            list (public), publish (seller/admin)
/// /book/search                     search (auth)
/// /book/user/me                    own books (auth)
/// /book/category/{category_id}     books in category (auth)
/// /book/{id}                       get (auth), update (owner), delete (owner/admin)
/// /book/{id}/download              download PDF (auth)
/// /book/{id}/image                 cover image (public)
///
/// /request                         apply (auth), list (admin)
/// /request/{id}/confirm            confirm (admin)
/// /request/{id}/refuse             refuse (admin)
/// /request/{id}                    delete (applicant/admin)
///
/// /payment                         list transactions (admin)
/// /payment/me                      own transactions (auth)
/// /payment/callback                gateway callback (public)
/// /payment/{book_id}               open payment (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/user", user::router())
        .nest("/category", category::router())
        .nest("/book", book::router())
        .nest("/request", seller_request::router())
        .nest("/payment", payment::router())
}
