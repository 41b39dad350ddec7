//! Seller request entity model and DTOs.

use librairie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `seller_requests` table joined with its status name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerRequest {
    pub id: DbId,
    #[serde(rename = "type")]
    pub request_type: String,
    pub response: String,
    pub user_id: DbId,
    pub status_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A request row joined with its status name and applicant details.
#[derive(Debug, Clone, FromRow)]
pub struct SellerRequestDetail {
    pub id: DbId,
    pub request_type: String,
    pub response: String,
    pub status: String,
    pub user_id: DbId,
    pub user_name: String,
    pub user_surname: String,
    pub user_email: String,
    pub created_at: Timestamp,
}

/// Applicant summary embedded in [`SellerRequestResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct Applicant {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// API shape of a seller request.
#[derive(Debug, Clone, Serialize)]
pub struct SellerRequestResponse {
    pub id: DbId,
    #[serde(rename = "type")]
    pub request_type: String,
    pub response: String,
    pub status: String,
    pub user: Applicant,
    pub created_at: Timestamp,
}

impl From<SellerRequestDetail> for SellerRequestResponse {
    fn from(row: SellerRequestDetail) -> Self {
        Self {
            id: row.id,
            request_type: row.request_type,
            response: row.response,
            status: row.status,
            user: Applicant {
                id: row.user_id,
                name: row.user_name,
                surname: row.user_surname,
                email: row.user_email,
            },
            created_at: row.created_at,
        }
    }
}

/// DTO for filing a new request. Requests always start as `PENDING`.
#[derive(Debug, Deserialize)]
pub struct CreateSellerRequest {
    pub request_type: String,
    pub response: String,
    pub user_id: DbId,
}
