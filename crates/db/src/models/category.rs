//! Category entity model.

use librairie_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::book::Book;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category together with every book filed under it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithBooks {
    #[serde(flatten)]
    pub category: Category,
    pub books: Vec<Book>,
}

impl CategoryWithBooks {
    /// Group `books` under their categories, preserving the order of both lists.
    pub fn group(categories: Vec<Category>, books: Vec<Book>) -> Vec<Self> {
        let mut grouped: Vec<Self> = categories
            .into_iter()
            .map(|category| Self {
                category,
                books: Vec::new(),
            })
            .collect();

        for book in books {
            if let Some(entry) = grouped
                .iter_mut()
                .find(|c| c.category.id == book.category_id)
            {
                entry.books.push(book);
            }
        }
        grouped
    }
}
