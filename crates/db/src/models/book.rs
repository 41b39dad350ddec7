//! Book entity model and DTOs.

use librairie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `books` table.
///
/// `image` and `pdf` are stored file names relative to the upload
/// directories, never full paths.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub stock: i32,
    pub image: String,
    pub pdf: String,
    pub click: i32,
    pub download: i32,
    pub user_id: DbId,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A book row joined with its category name.
#[derive(Debug, Clone, FromRow)]
pub struct BookWithCategory {
    #[sqlx(flatten)]
    pub book: Book,
    pub category_name: String,
}

/// Category reference embedded in [`BookResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
}

/// API shape of a book: the row plus its category.
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    #[serde(flatten)]
    pub book: Book,
    pub category: CategoryRef,
}

impl From<BookWithCategory> for BookResponse {
    fn from(row: BookWithCategory) -> Self {
        let category = CategoryRef {
            id: row.book.category_id,
            name: row.category_name,
        };
        Self {
            book: row.book,
            category,
        }
    }
}

/// DTO for inserting a book once its files are stored.
#[derive(Debug, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub stock: i32,
    pub image: String,
    pub pdf: String,
    pub user_id: DbId,
    pub category_id: DbId,
}

/// DTO for replacing a book's editable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateBook {
    pub title: String,
    pub description: String,
    pub author: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: DbId,
}
