//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod book_repo;
pub mod category_repo;
pub mod role_repo;
pub mod seller_request_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use book_repo::BookRepo;
pub use category_repo::CategoryRepo;
pub use role_repo::RoleRepo;
pub use seller_request_repo::SellerRequestRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
