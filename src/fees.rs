//! Fee-schedule service client
//!
//! Fetches the nested Customer/Business fee table and extracts the two
//! processing-fee overrides the resolver consumes. Fee strings stay opaque
//! display text apart from the lenient numeric parser below.

use std::time::Duration;

use lazy_static::lazy_static;
use reqwest::Client;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::models::{FeeSchedule, ProcessingFeeOverrides};

const PAYOUT_CATEGORY: &str = "Payout";
const NGN_VBA_CATEGORY: &str = "NG Virtual Bank Account";
const USD_PAYOUT_SERVICE: &str = "USD Payout - 24hours";
const NGN_FUNDING_SERVICE: &str = "NGN Wallet Funding";

lazy_static! {
    static ref FALLBACK_FEES: FeeSchedule =
        serde_json::from_str(include_str!("../assets/fees-fallback.json"))
            .expect("bundled fees-fallback.json is malformed");
}

/// The bundled fee document, same shape as the live API body.
pub fn fallback_schedule() -> FeeSchedule {
    FALLBACK_FEES.clone()
}

/// Strip everything but digits and the decimal point, then parse.
/// Purely textual amounts ("free") come back as `None`.
pub fn parse_fee_amount(display: &str) -> Option<f64> {
    let cleaned: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pull the two processing-fee overrides out of a schedule by exact
/// `Service` label match under the Customer group.
pub fn extract_overrides(schedule: &FeeSchedule) -> ProcessingFeeOverrides {
    let find = |category: &str, service: &str| {
        schedule
            .customer
            .get(category)
            .and_then(|items| items.iter().find(|item| item.service == service))
            .and_then(|item| parse_fee_amount(&item.fee))
    };

    ProcessingFeeOverrides {
        usd_payout_24h: find(PAYOUT_CATEGORY, USD_PAYOUT_SERVICE),
        ngn_wallet_funding: find(NGN_VBA_CATEGORY, NGN_FUNDING_SERVICE),
    }
}

/// Reusable fee-service client (connection-pooled).
#[derive(Clone)]
pub struct FeeApiClient {
    client: Client,
    base_url: Option<String>,
}

impl FeeApiClient {
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// The full fee table from the live service.
    pub async fn fetch_schedule(&self) -> Result<FeeSchedule> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| EngineError::NotConfigured("fee endpoint".to_string()))?;

        info!("Fetching live fee schedule");

        let response = self
            .client
            .get(base)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::FeeUnavailable(format!(
                "fee API returned {}",
                response.status()
            )));
        }

        response
            .json::<FeeSchedule>()
            .await
            .map_err(|e| EngineError::FeeUnavailable(format!("invalid fee response: {}", e)))
    }

    /// Overrides from the live schedule only. A failed call degrades to
    /// empty overrides; the resolver then applies its hardcoded defaults.
    pub async fn fetch_overrides(&self) -> ProcessingFeeOverrides {
        match self.fetch_schedule().await {
            Ok(schedule) => extract_overrides(&schedule),
            Err(error) => {
                warn!("Fee overrides unavailable, using defaults: {}", error);
                ProcessingFeeOverrides::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fee_amount_currency_prefixes() {
        assert_eq!(parse_fee_amount("$2.00"), Some(2.0));
        assert_eq!(parse_fee_amount("₦500"), Some(500.0));
        assert_eq!(parse_fee_amount("1.5%"), Some(1.5));
    }

    #[test]
    fn test_parse_fee_amount_textual_is_absent() {
        assert_eq!(parse_fee_amount("free"), None);
        assert_eq!(parse_fee_amount(""), None);
    }

    #[test]
    fn test_extract_overrides_from_bundled_schedule() {
        let overrides = extract_overrides(&fallback_schedule());

        assert_eq!(overrides.usd_payout_24h, Some(2.0));
        // "₦0" parses to an explicit zero override, not an absent one.
        assert_eq!(overrides.ngn_wallet_funding, Some(0.0));
    }

    #[test]
    fn test_extract_overrides_missing_entries() {
        let schedule = FeeSchedule {
            customer: Default::default(),
            business: Default::default(),
        };
        let overrides = extract_overrides(&schedule);

        assert_eq!(overrides.usd_payout_24h, None);
        assert_eq!(overrides.ngn_wallet_funding, None);
    }

    #[tokio::test]
    async fn test_unconfigured_client_degrades_to_defaults() {
        let client = FeeApiClient::new(None);
        let overrides = client.fetch_overrides().await;

        assert_eq!(overrides, ProcessingFeeOverrides::default());
    }
}
