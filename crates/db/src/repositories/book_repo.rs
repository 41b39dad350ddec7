//! Repository for the `books` table.

use librairie_core::types::DbId;
use sqlx::PgPool;

use crate::models::book::{Book, BookWithCategory, CreateBook, UpdateBook};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, author, price, stock, image, pdf, \
                        click, download, user_id, category_id, created_at, updated_at";

/// Columns for [`BookWithCategory`], selected from `books b JOIN categories c`.
const JOINED_COLUMNS: &str = "b.id, b.title, b.description, b.author, b.price, b.stock, \
                               b.image, b.pdf, b.click, b.download, b.user_id, b.category_id, \
                               b.created_at, b.updated_at, c.name AS category_name";

/// Provides CRUD and catalogue queries for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (title, description, author, price, stock, image, pdf, user_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.author)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image)
            .bind(&input.pdf)
            .bind(input.user_id)
            .bind(input.category_id)
            .fetch_one(pool)
            .await
    }

    /// Find a book by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a book with its category name.
    pub async fn find_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM books b JOIN categories c ON c.id = b.category_id
             WHERE b.id = $1"
        );
        sqlx::query_as::<_, BookWithCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List books with their categories, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM books b JOIN categories c ON c.id = b.category_id
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, BookWithCategory>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every book as a bare row, ordered by title. Used to group books
    /// under their categories.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY title ASC, id ASC");
        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// List books published by a user, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<BookWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM books b JOIN categories c ON c.id = b.category_id
             WHERE b.user_id = $1
             ORDER BY b.created_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, BookWithCategory>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List books filed under a category, newest first.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<BookWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM books b JOIN categories c ON c.id = b.category_id
             WHERE b.category_id = $1
             ORDER BY b.created_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, BookWithCategory>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over title, author and description.
    ///
    /// `pattern` must already be an escaped `ILIKE` pattern
    /// (see `librairie_core::search::contains_pattern`).
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM books b JOIN categories c ON c.id = b.category_id
             WHERE b.title ILIKE $1 OR b.author ILIKE $1 OR b.description ILIKE $1
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BookWithCategory>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace a book's editable fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = $2,
                description = $3,
                author = $4,
                price = $5,
                stock = $6,
                category_id = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.author)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically bump the view counter. Returns `false` if the book is gone.
    pub async fn increment_click(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE books SET click = click + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the download counter. Returns `false` if the book is gone.
    pub async fn increment_download(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE books SET download = download + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a book, returning the removed row so its files can be cleaned up.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("DELETE FROM books WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
