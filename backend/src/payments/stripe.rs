//! Stripe Checkout adapter.
//!
//! Owns transport details only: form encoding of the session request, bearer
//! authentication, and mapping of provider errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{CheckoutRequest, CheckoutSession, PaymentProvider};
use crate::errors::AppError;

const SESSIONS_PATH: [&str; 3] = ["v1", "checkout", "sessions"];

/// Stripe Checkout sessions API client.
pub struct StripeCheckout {
    client: Client,
    endpoint: Url,
    secret_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeCheckout {
    /// Build a client with an explicit request timeout.
    ///
    /// Without a secret key every session request fails with a provider error.
    pub fn new(
        api_base: &Url,
        secret_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let endpoint = sessions_endpoint(api_base)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            secret_key,
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AppError> {
        let Some(secret_key) = self.secret_key.as_deref() else {
            return Err(AppError::PaymentProvider(
                "Payment provider is not configured".to_string(),
            ));
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(secret_key)
            .form(&session_form(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let detail = serde_json::from_slice::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "no error message".to_string());
            tracing::error!("Checkout session creation failed ({}): {}", status, detail);
            return Err(AppError::PaymentProvider(format!(
                "Failed to create checkout session ({}): {}",
                status, detail
            )));
        }

        let session: StripeSession = serde_json::from_slice(&body).map_err(|e| {
            AppError::PaymentProvider(format!("Unexpected checkout session response: {}", e))
        })?;

        tracing::info!(
            "Created checkout session {} for {} ({} {})",
            session.id,
            request.product_name,
            request.unit_amount,
            request.currency
        );
        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}

/// Append the sessions path to the base, keeping any path prefix it carries.
fn sessions_endpoint(api_base: &Url) -> Result<Url, AppError> {
    let mut endpoint = api_base.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    endpoint
        .path_segments_mut()
        .map_err(|_| AppError::Internal(format!("Invalid payment API base {}", api_base)))?
        .pop_if_empty()
        .extend(SESSIONS_PATH);
    Ok(endpoint)
}

fn session_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        (
            "line_items[0][price_data][currency]",
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]",
            request.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.unit_amount.to_string(),
        ),
        ("line_items[0][quantity]", request.quantity.to_string()),
        ("success_url", request.success_url.to_string()),
        ("cancel_url", request.cancel_url.to_string()),
    ]
}
