use std::sync::Arc;

use librairie_events::Mailer;
use librairie_payment::PaymentGateway;

use crate::config::ServerConfig;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: librairie_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outbound email (SMTP, or log-only when SMTP is not configured).
    pub mailer: Arc<dyn Mailer>,
    /// Hosted payment gateway.
    pub payments: Arc<dyn PaymentGateway>,
    /// On-disk store for book covers and PDFs.
    pub uploads: Arc<UploadStore>,
}
