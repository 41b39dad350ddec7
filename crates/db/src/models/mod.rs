//! Row models and DTOs, one module per table.

pub mod book;
pub mod category;
pub mod role;
pub mod seller_request;
pub mod transaction;
pub mod user;
