//! Handlers for the project payment ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gigline_core::payment::{CardData, PaymentDraft};
use gigline_core::types::{ProjectId, UserId};
use gigline_db::models::payment::Payment;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::require_project;
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/payments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub recipient_id: UserId,
    /// Amount in minor units (cents).
    pub amount_cents: i64,
    pub card: CardData,
}

/// POST /api/v1/projects/{id}/payments
///
/// The acting user is the payer. Returns 201 with the completed ledger
/// entry, or 402 when the gateway refuses the charge.
pub async fn create_payment(
    user: ActingUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    require_project(&state, &project_id).await?;

    let draft = PaymentDraft {
        project_id,
        payer_id: user.user_id,
        recipient_id: input.recipient_id,
        amount_cents: input.amount_cents,
    };
    let payment = state.payments.process_payment(draft, input.card).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// GET /api/v1/projects/{id}/payments
///
/// Oldest first.
pub async fn list_payments(
    _user: ActingUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    require_project(&state, &project_id).await?;
    let payments = state.payments.list_payments(&project_id).await?;
    Ok(Json(DataResponse { data: payments }))
}
