//! Domain building blocks for the bookstore backend.
//!
//! This crate has no I/O: it holds the shared error type, id/timestamp
//! aliases, well-known lookup names and the pure validation helpers used by
//! the repository and HTTP layers.

pub mod error;
pub mod roles;
pub mod search;
pub mod seller_request;
pub mod transaction;
pub mod types;
pub mod upload;
pub mod validation;
