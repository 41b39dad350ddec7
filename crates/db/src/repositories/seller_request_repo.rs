//! Repository for the `seller_requests` table.

use librairie_core::seller_request::STATUS_PENDING;
use librairie_core::types::DbId;
use sqlx::PgPool;

use crate::models::seller_request::{CreateSellerRequest, SellerRequest, SellerRequestDetail};

/// Columns for [`SellerRequest`], selected from `<alias> JOIN request_statuses s`.
fn columns(alias: &str) -> String {
    format!(
        "{alias}.id, {alias}.request_type, {alias}.response, {alias}.user_id, \
         {alias}.status_id, s.name AS status, {alias}.created_at, {alias}.updated_at"
    )
}

/// Columns for [`SellerRequestDetail`].
const DETAIL_COLUMNS: &str = "sr.id, sr.request_type, sr.response, s.name AS status, \
                               u.id AS user_id, u.name AS user_name, u.surname AS user_surname, \
                               u.email AS user_email, sr.created_at";

/// Provides CRUD operations and status transitions for seller requests.
pub struct SellerRequestRepo;

impl SellerRequestRepo {
    /// File a new request in `PENDING` state, returning the created row.
    ///
    /// Returns `None` (and inserts nothing) if the user already has a
    /// pending request. Filings for the same user are serialized on a
    /// transaction-scoped advisory lock keyed by the user ID.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSellerRequest,
    ) -> Result<Option<SellerRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(input.user_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "WITH pending AS (
                SELECT id FROM request_statuses WHERE name = $4
             ),
             inserted AS (
                INSERT INTO seller_requests (request_type, response, user_id, status_id)
                SELECT $1, $2, $3, p.id
                FROM pending p
                WHERE NOT EXISTS (
                    SELECT 1 FROM seller_requests
                    WHERE user_id = $3 AND status_id = p.id
                )
                RETURNING *
             )
             SELECT {}
             FROM inserted i JOIN request_statuses s ON s.id = i.status_id",
            columns("i")
        );
        let created = sqlx::query_as::<_, SellerRequest>(&query)
            .bind(&input.request_type)
            .bind(&input.response)
            .bind(input.user_id)
            .bind(STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Find a request by internal ID, with its status name.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SellerRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {}
             FROM seller_requests sr JOIN request_statuses s ON s.id = sr.status_id
             WHERE sr.id = $1",
            columns("sr")
        );
        sqlx::query_as::<_, SellerRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request with its status name and applicant details.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SellerRequestDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM seller_requests sr
             JOIN request_statuses s ON s.id = sr.status_id
             JOIN users u ON u.id = sr.user_id
             WHERE sr.id = $1"
        );
        sqlx::query_as::<_, SellerRequestDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all requests with applicant details, newest first.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<SellerRequestDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM seller_requests sr
             JOIN request_statuses s ON s.id = sr.status_id
             JOIN users u ON u.id = sr.user_id
             ORDER BY sr.created_at DESC, sr.id DESC"
        );
        sqlx::query_as::<_, SellerRequestDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Move a `PENDING` request to `to_status`, optionally promoting the
    /// applicant to `promote_to_role` in the same database transaction.
    ///
    /// Returns `false` (and changes nothing) if the request does not exist or
    /// is no longer pending.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        to_status: &str,
        promote_to_role: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let applicant: Option<(DbId,)> = sqlx::query_as(
            "UPDATE seller_requests
             SET status_id = (SELECT id FROM request_statuses WHERE name = $2)
             WHERE id = $1
               AND status_id = (SELECT id FROM request_statuses WHERE name = $3)
             RETURNING user_id",
        )
        .bind(id)
        .bind(to_status)
        .bind(STATUS_PENDING)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id,)) = applicant else {
            return Ok(false);
        };

        if let Some(role) = promote_to_role {
            sqlx::query(
                "UPDATE users SET role_id = (SELECT id FROM roles WHERE name = $2) WHERE id = $1",
            )
            .bind(user_id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a request. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seller_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
