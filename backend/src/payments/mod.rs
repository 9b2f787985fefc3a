//! Payment provider integration.
//!
//! Checkout happens on the provider's hosted page; this module only creates sessions and
//! decides where the provider redirects afterwards.

mod checkout;
mod stripe;

pub use checkout::*;
pub use stripe::*;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use crate::errors::AppError;

/// A single-item hosted checkout to create with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub description: String,
    /// Price in the smallest currency unit
    pub unit_amount: u64,
    pub currency: String,
    pub quantity: u64,
    pub success_url: Url,
    pub cancel_url: Url,
}

/// Session handle returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Creates hosted checkout sessions.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AppError>;
}
