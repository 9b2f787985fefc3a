//! Vote credit request and response bodies.

use serde::{Deserialize, Serialize};

/// Query parameters for the balance endpoint.
#[derive(Debug, Deserialize)]
pub struct CreditStatusQuery {
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreditStatusResponse {
    pub credits: u64,
}

/// Request body for adding purchased credits.
#[derive(Debug, Deserialize)]
pub struct AddCreditsRequest {
    #[serde(default)]
    pub user: String,
    pub credits: i64,
}

#[derive(Debug, Serialize)]
pub struct AddCreditsResponse {
    pub success: bool,
    pub credits: u64,
}

/// Request body for spending one credit on a story.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseVoteCreditRequest {
    #[serde(default)]
    pub user: String,
    pub story_id: i64,
}

/// Result of a successful vote spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub remaining_credits: u64,
    pub new_vote_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseVoteCreditResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: VoteReceipt,
}
