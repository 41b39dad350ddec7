//! Handlers for the `/payment` resource.
//!
//! Payments happen on the gateway's hosted page; this module opens gateway
//! transactions, mirrors their status locally and reports the outcome when
//! the gateway redirects back.

use axum::extract::{Path, Query, State};
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::transaction::{amount_from_price, PaymentStatus};
use librairie_core::types::DbId;
use librairie_db::models::transaction::{CreateTransaction, TransactionResponse};
use librairie_db::repositories::{BookRepo, TransactionRepo, UserRepo};
use librairie_payment::{Customer, GatewayTransaction, NewPayment};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::CallbackParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Payload returned when a payment is opened.
#[derive(Debug, Serialize)]
pub struct PaymentCreated {
    pub transaction_id: i64,
    pub status: String,
    pub payment_url: String,
}

/// GET /api/payment/{book_id}
///
/// Open a gateway transaction for the book and return the checkout URL.
pub async fn create_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<PaymentCreated>>> {
    let book = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;
    let buyer = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let settings = &state.config.payment;
    let payment = NewPayment {
        description: format!("Purchase of book: {}", book.title),
        amount: amount_from_price(book.price),
        currency: settings.currency.clone(),
        callback_url: settings.callback_url.clone(),
        customer: Customer {
            email: buyer.email,
            firstname: buyer.name,
        },
    };

    let transaction = state.payments.create_transaction(&payment).await?;
    let link = state.payments.generate_token(transaction.id).await?;

    let recorded = TransactionRepo::create(
        &state.pool,
        &CreateTransaction {
            transaction_id: transaction.id,
            status: transaction.status.clone(),
            book_id: book.id,
            user_id: buyer.id,
        },
    )
    .await;
    if let Err(e) = recorded {
        // The gateway already holds this transaction; keep its id findable.
        tracing::error!(
            transaction_id = transaction.id,
            book_id = book.id,
            user_id = buyer.id,
            error = %e,
            "Gateway transaction opened but not recorded locally"
        );
        return Err(e.into());
    }
    tracing::info!(
        transaction_id = transaction.id,
        book_id = book.id,
        user_id = buyer.id,
        "Payment opened"
    );

    Ok(Json(ApiResponse::ok(
        "Payment created",
        PaymentCreated {
            transaction_id: transaction.id,
            status: transaction.status,
            payment_url: link.url,
        },
    )))
}

/// GET /api/payment/callback?id=
///
/// Called by the gateway (through the buyer's browser) once a payment
/// settles. The envelope's `status` reports whether the payment went through.
pub async fn payment_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Json<ApiResponse<GatewayTransaction>>> {
    let raw_id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing transaction id".into()))?;
    let transaction_id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid transaction id: {raw_id}")))?;

    let transaction = state.payments.retrieve(transaction_id).await?;
    let updated =
        TransactionRepo::update_status_by_gateway_id(&state.pool, transaction.id, &transaction.status)
            .await?;
    if updated == 0 {
        tracing::warn!(transaction_id = transaction.id, "Callback for an unknown transaction");
    }

    let status = PaymentStatus::parse(&transaction.status);
    tracing::info!(
        transaction_id = transaction.id,
        status = %transaction.status,
        rows = updated,
        "Payment callback processed"
    );
    Ok(Json(ApiResponse::with_status(
        status.is_success(),
        status.message(),
        transaction,
    )))
}

/// GET /api/payment
pub async fn list_transactions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TransactionResponse>>>> {
    let transactions = TransactionRepo::list_details(&state.pool)
        .await?
        .into_iter()
        .map(TransactionResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok("Transactions retrieved", transactions)))
}

/// GET /api/payment/me
pub async fn my_transactions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TransactionResponse>>>> {
    let transactions = TransactionRepo::list_details_for_user(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(TransactionResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok("Transactions retrieved", transactions)))
}
