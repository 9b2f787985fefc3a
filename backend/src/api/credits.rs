//! Vote credit API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{
    AddCreditsRequest, AddCreditsResponse, CreditStatusQuery, CreditStatusResponse,
    UseVoteCreditRequest, UseVoteCreditResponse,
};
use crate::AppState;

/// GET /api/vote-pack-status?user=ID - Get a user's credit balance.
///
/// Never fails: an unreadable ledger or missing user reports zero credits.
pub async fn vote_pack_status(
    State(state): State<AppState>,
    Query(query): Query<CreditStatusQuery>,
) -> Json<CreditStatusResponse> {
    let Some(user) = query.user.filter(|u| !u.trim().is_empty()) else {
        return Json(CreditStatusResponse { credits: 0 });
    };

    let credits = match state.ledger.get_balance(&user).await {
        Ok(credits) => credits,
        Err(e) => {
            tracing::warn!("Failed to read credit balance for {}: {}", user, e);
            0
        }
    };

    Json(CreditStatusResponse { credits })
}

/// POST /api/add-vote-credits - Credit a purchased vote pack.
pub async fn add_vote_credits(
    State(state): State<AppState>,
    Json(request): Json<AddCreditsRequest>,
) -> ApiResult<AddCreditsResponse> {
    let amount = u64::try_from(request.credits)
        .map_err(|_| AppError::Validation("Credit amount must be greater than zero".into()))?;
    let credits = state.ledger.add_credits(&request.user, amount).await?;

    Ok(Json(AddCreditsResponse {
        success: true,
        credits,
    }))
}

/// POST /api/use-vote-credit - Spend one credit for five votes on a story.
pub async fn use_vote_credit(
    State(state): State<AppState>,
    Json(request): Json<UseVoteCreditRequest>,
) -> ApiResult<UseVoteCreditResponse> {
    let receipt = state
        .votes
        .spend_vote_credit(&request.user, request.story_id)
        .await?;

    Ok(Json(UseVoteCreditResponse {
        success: true,
        receipt,
    }))
}
