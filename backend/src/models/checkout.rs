//! Checkout session request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for a priority boost checkout.
///
/// `formData` holds the pending submission so the success redirect can carry it back.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostCheckoutRequest {
    #[serde(default)]
    pub form_data: Map<String, Value>,
}

/// Request body for a vote pack checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePackCheckoutRequest {
    pub pack: i64,
    /// Price in the smallest currency unit
    pub amount: i64,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub story_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
