//! Handlers for the `/request` resource: applications to become a seller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::roles::{can_publish, ROLE_SELLER};
use librairie_core::seller_request::{ensure_pending, Decision};
use librairie_core::types::DbId;
use librairie_core::validation::not_blank;
use librairie_db::models::seller_request::{
    CreateSellerRequest, SellerRequest, SellerRequestResponse,
};
use librairie_db::repositories::{SellerRequestRepo, UserRepo};
use librairie_events::{DecisionNotice, Recipient};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /request`.
#[derive(Debug, Deserialize, Validate)]
pub struct SellerApplication {
    #[serde(rename = "type", default)]
    #[validate(custom(function = "not_blank"))]
    pub request_type: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub response: String,
}

/// Request body for `PUT /request/{id}/refuse`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefuseRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub reason: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Request",
        id,
    })
}

/// POST /api/request
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SellerApplication>,
) -> AppResult<(StatusCode, Json<ApiResponse<SellerRequest>>)> {
    // The token may predate a promotion, so check the stored role.
    let user = UserRepo::find_response_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if can_publish(&user.role) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User already has the {} role",
            user.role
        ))));
    }
    let request = SellerRequestRepo::create(
        &state.pool,
        &CreateSellerRequest {
            request_type: input.request_type.trim().to_string(),
            response: input.response.trim().to_string(),
            user_id: user.id,
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "A request is already awaiting review".into(),
        ))
    })?;
    tracing::info!(request_id = request.id, user_id = user.id, "Seller request filed");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Request submitted", request)),
    ))
}

/// GET /api/request
pub async fn list_requests(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SellerRequestResponse>>>> {
    let requests = SellerRequestRepo::list_details(&state.pool)
        .await?
        .into_iter()
        .map(SellerRequestResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok("Requests retrieved", requests)))
}

/// PUT /api/request/{id}/confirm
///
/// Promotes the applicant to `SELLER` and emails them.
pub async fn confirm_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<SellerRequestResponse>>> {
    decide(&state, admin.user_id, id, Decision::Confirm).await
}

/// PUT /api/request/{id}/refuse
pub async fn refuse_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<RefuseRequest>,
) -> AppResult<Json<ApiResponse<SellerRequestResponse>>> {
    let decision = Decision::refuse(&input.reason)?;
    decide(&state, admin.user_id, id, decision).await
}

/// Apply a decision to a pending request, then notify the applicant.
///
/// The decision is committed before the email is sent; a mail failure is
/// reported as 502 but does not undo it.
async fn decide(
    state: &AppState,
    admin_id: DbId,
    id: DbId,
    decision: Decision,
) -> AppResult<Json<ApiResponse<SellerRequestResponse>>> {
    let request = SellerRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_pending(id, &request.status)?;

    let promote_to = match decision {
        Decision::Confirm => Some(ROLE_SELLER),
        Decision::Refuse { .. } => None,
    };
    let applied =
        SellerRequestRepo::decide(&state.pool, id, decision.target_status(), promote_to).await?;
    if !applied {
        // Decided concurrently between the read and the update.
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Request {id} has already been processed"
        ))));
    }
    tracing::info!(
        request_id = id,
        decided_by = admin_id,
        status = decision.target_status(),
        "Seller request decided"
    );

    let detail = SellerRequestRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let recipient = Recipient {
        email: detail.user_email.clone(),
        name: detail.user_name.clone(),
        surname: detail.user_surname.clone(),
    };

    let outcome = match decision {
        Decision::Confirm => "Request confirmed",
        Decision::Refuse { .. } => "Request refused",
    };
    if let Err(e) = DecisionNotice::send(state.mailer.as_ref(), &recipient, &decision).await {
        tracing::error!(request_id = id, to = %recipient.email, error = %e, "Decision email failed");
        return Err(AppError::Upstream(format!(
            "{outcome}, but the notification email could not be sent"
        )));
    }

    Ok(Json(ApiResponse::ok(
        outcome,
        SellerRequestResponse::from(detail),
    )))
}

/// DELETE /api/request/{id}
///
/// Allowed for the applicant and for administrators.
pub async fn delete_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let request = SellerRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !auth.owns_or_admin(request.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the applicant or an administrator can delete this request".into(),
        )));
    }

    if !SellerRequestRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::message("Request deleted")))
}
