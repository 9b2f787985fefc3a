//! Checkout session API endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{BoostCheckoutRequest, CheckoutSessionResponse, VotePackCheckoutRequest};
use crate::payments::CheckoutRequest;
use crate::AppState;

/// POST /api/create-checkout-session - Start a priority boost payment.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<BoostCheckoutRequest>,
) -> ApiResult<CheckoutSessionResponse> {
    let checkout = state.checkout.boost(&request.form_data)?;
    start_checkout(&state, &checkout).await
}

/// POST /api/create-vote-pack-session - Start a vote pack payment.
pub async fn create_vote_pack_session(
    State(state): State<AppState>,
    Json(request): Json<VotePackCheckoutRequest>,
) -> ApiResult<CheckoutSessionResponse> {
    let checkout = state.checkout.vote_pack(&request)?;
    start_checkout(&state, &checkout).await
}

async fn start_checkout(
    state: &AppState,
    checkout: &CheckoutRequest,
) -> ApiResult<CheckoutSessionResponse> {
    let session = state.payments.create_checkout_session(checkout).await?;

    Ok(Json(CheckoutSessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}
