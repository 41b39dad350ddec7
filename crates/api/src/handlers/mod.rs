pub mod auth;
pub mod book;
pub mod category;
pub mod payment;
pub mod seller_request;
pub mod user;
