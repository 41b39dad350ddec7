//! Repository for the `transactions` table.

use librairie_core::types::DbId;
use sqlx::PgPool;

use crate::models::transaction::{CreateTransaction, Transaction, TransactionDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, transaction_id, status, book_id, user_id, created_at, updated_at";

/// Columns for [`TransactionDetail`].
const DETAIL_COLUMNS: &str = "t.id, t.transaction_id, t.status, t.created_at, \
                               b.id AS book_id, b.title AS book_title, b.price AS book_price, \
                               u.id AS user_id, u.name AS user_name, u.surname AS user_surname, \
                               u.email AS user_email";

/// Provides persistence for the local mirror of gateway transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Record a freshly created gateway transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (transaction_id, status, book_id, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.transaction_id)
            .bind(&input.status)
            .bind(input.book_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find all local rows mirroring a gateway transaction.
    pub async fn find_by_gateway_id(
        pool: &PgPool,
        transaction_id: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE transaction_id = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction_id)
            .fetch_all(pool)
            .await
    }

    /// Set the status of every row mirroring a gateway transaction.
    ///
    /// Returns the number of rows updated.
    pub async fn update_status_by_gateway_id(
        pool: &PgPool,
        transaction_id: i64,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE transactions SET status = $2 WHERE transaction_id = $1")
            .bind(transaction_id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List all transactions with book and buyer, newest first.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<TransactionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM transactions t
             JOIN books b ON b.id = t.book_id
             JOIN users u ON u.id = t.user_id
             ORDER BY t.created_at DESC, t.updated_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TransactionDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// List a buyer's transactions, newest first.
    pub async fn list_details_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TransactionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM transactions t
             JOIN books b ON b.id = t.book_id
             JOIN users u ON u.id = t.user_id
             WHERE t.user_id = $1
             ORDER BY t.created_at DESC, t.updated_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TransactionDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
