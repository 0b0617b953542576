//! Exchange-rate service client
//!
//! Calls the rate endpoint once per directional pair; the two directions the
//! rate board needs are fetched in parallel. Each direction is an independent
//! quote — no reciprocal is ever inferred while a direct quote exists. A
//! bundled table backs every lookup when the live call fails or the endpoint
//! is unconfigured.
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use std::time::Duration;

use lazy_static::lazy_static;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::models::{CurrencyCode, RatePair, RateQuote};

lazy_static! {
    static ref FALLBACK_RATES: RatePair =
        serde_json::from_str(include_str!("../assets/rates-fallback.json"))
            .expect("bundled rates-fallback.json is malformed");
}

/// The bundled rate table, both directions stored independently.
pub fn fallback_pair() -> RatePair {
    *FALLBACK_RATES
}

/// Bundled-table lookup for one directional pair. Identity pairs are 1.
pub fn fallback_quote(from: CurrencyCode, to: CurrencyCode) -> RateQuote {
    RateQuote {
        from,
        to,
        rate: FALLBACK_RATES.quote(from, to),
    }
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    rate: f64,
}

/// Reusable exchange-rate client (connection-pooled).
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: Client,
    base_url: Option<String>,
}

impl ExchangeRateClient {
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

    /// One directional quote from the live service.
    pub async fn fetch_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<RateQuote> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| EngineError::NotConfigured("exchange-rate endpoint".to_string()))?;

        let url = format!("{}?from={}&to={}", base, from.code(), to.code());

        info!("Fetching live rate {} -> {}", from, to);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::RateUnavailable(format!(
                "exchange API returned {} for {}_{}",
                response.status(),
                from,
                to
            )));
        }

        let body: RateResponse = response.json().await.map_err(|e| {
            EngineError::RateUnavailable(format!("invalid exchange response: {}", e))
        })?;

        let quote = RateQuote {
            from,
            to,
            rate: body.rate,
        };

        if !quote.is_usable() {
            return Err(EngineError::RateUnavailable(format!(
                "non-numeric rate for {}_{}",
                from, to
            )));
        }

        Ok(quote)
    }

    /// Both directions at once, fan-out/fan-in. Proceeds only when both
    /// settle successfully.
    pub async fn fetch_pair(&self) -> Result<RatePair> {
        let (usd_ngn, ngn_usd) = tokio::join!(
            self.fetch_rate(CurrencyCode::Usd, CurrencyCode::Ngn),
            self.fetch_rate(CurrencyCode::Ngn, CurrencyCode::Usd),
        );

        Ok(RatePair {
            usd_ngn: usd_ngn?.rate,
            ngn_usd: ngn_usd?.rate,
        })
    }
}
