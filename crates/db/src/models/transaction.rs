//! Payment transaction mirror model and DTOs.

use librairie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `transactions` table.
///
/// `transaction_id` is the payment gateway's identifier; `status` mirrors the
/// gateway's last reported status verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub transaction_id: i64,
    pub status: String,
    pub book_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A transaction joined with the purchased book and the buyer.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionDetail {
    pub id: DbId,
    pub transaction_id: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub book_id: DbId,
    pub book_title: String,
    pub book_price: f64,
    pub user_id: DbId,
    pub user_name: String,
    pub user_surname: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchasedBook {
    pub id: DbId,
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Buyer {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// API shape of a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: DbId,
    pub transaction_id: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub book: PurchasedBook,
    pub user: Buyer,
}

impl From<TransactionDetail> for TransactionResponse {
    fn from(row: TransactionDetail) -> Self {
        Self {
            id: row.id,
            transaction_id: row.transaction_id,
            status: row.status,
            created_at: row.created_at,
            book: PurchasedBook {
                id: row.book_id,
                title: row.book_title,
                price: row.book_price,
            },
            user: Buyer {
                id: row.user_id,
                name: row.user_name,
                surname: row.user_surname,
                email: row.user_email,
            },
        }
    }
}

/// DTO for recording a freshly created gateway transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub transaction_id: i64,
    pub status: String,
    pub book_id: DbId,
    pub user_id: DbId,
}
