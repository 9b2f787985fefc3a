//! Checkout session planning: prices, product text and redirect URLs.

use reqwest::Url;
use serde_json::{Map, Value};

use super::CheckoutRequest;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::VotePackCheckoutRequest;

pub const BOOST_PRODUCT_NAME: &str = "Priority Story Boost";
pub const BOOST_DESCRIPTION: &str =
    "Get featured placement and increased visibility for your story";
pub const VOTE_PACK_DESCRIPTION: &str = "Each credit adds 5 community votes to a story";

/// Builds checkout requests whose redirects lead back into the frontend.
#[derive(Debug, Clone)]
pub struct CheckoutPlanner {
    frontend_url: Url,
    currency: String,
    boost_price_cents: u64,
}

impl CheckoutPlanner {
    pub fn from_config(config: &Config) -> Self {
        Self {
            frontend_url: config.frontend_url.clone(),
            currency: config.currency.clone(),
            boost_price_cents: config.boost_price_cents,
        }
    }

    /// Priority boost for a story that has not been submitted yet.
    ///
    /// The pending form travels in the success URL so the frontend can resubmit it
    /// with the priority flag once payment succeeds.
    pub fn boost(&self, form_data: &Map<String, Value>) -> Result<CheckoutRequest, AppError> {
        let mut success_query = vec![("priority", "success".to_string())];
        success_query.extend(
            form_data
                .iter()
                .filter_map(|(key, value)| query_value(value).map(|v| (key.as_str(), v))),
        );

        Ok(CheckoutRequest {
            product_name: BOOST_PRODUCT_NAME.to_string(),
            description: BOOST_DESCRIPTION.to_string(),
            unit_amount: self.boost_price_cents,
            currency: self.currency.clone(),
            quantity: 1,
            success_url: self.frontend_page(&["submit-story"], &success_query)?,
            cancel_url: self
                .frontend_page(&["submit-story"], &[("priority", "cancel".to_string())])?,
        })
    }

    /// Pack of vote credits; the success redirect tells the frontend what to credit.
    pub fn vote_pack(&self, request: &VotePackCheckoutRequest) -> Result<CheckoutRequest, AppError> {
        let pack = u64::try_from(request.pack)
            .ok()
            .filter(|pack| *pack > 0)
            .ok_or_else(|| AppError::Validation("Pack size must be greater than zero".into()))?;
        let amount = u64::try_from(request.amount)
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| AppError::Validation("Amount must be greater than zero".into()))?;

        let story_segment = request.story_id.map(|id| id.to_string());
        let mut segments = vec!["stories"];
        if let Some(id) = story_segment.as_deref() {
            segments.push(id);
        }

        let mut success_query = vec![
            ("votepack", "success".to_string()),
            ("pack", pack.to_string()),
        ];
        if let Some(user) = request.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            success_query.push(("user", user.to_string()));
        }

        Ok(CheckoutRequest {
            product_name: format!("{} Vote Credits", pack),
            description: VOTE_PACK_DESCRIPTION.to_string(),
            unit_amount: amount,
            currency: self.currency.clone(),
            quantity: 1,
            success_url: self.frontend_page(&segments, &success_query)?,
            cancel_url: self.frontend_page(&segments, &[("votepack", "cancel".to_string())])?,
        })
    }

    fn frontend_page(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, AppError> {
        let mut url = self.frontend_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Internal(format!(
                    "Frontend URL {} cannot carry a path",
                    self.frontend_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Scalars become query values; null and nested values are dropped.
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
