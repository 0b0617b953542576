//! Core data models for the swap engine and assistant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

//
// ================= Currencies =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Ngn,
}

impl CurrencyCode {
    pub const ALL: &'static [CurrencyCode] = &[CurrencyCode::Usd, CurrencyCode::Ngn];

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Ngn => "NGN",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "$",
            CurrencyCode::Ngn => "₦",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(CurrencyCode::Usd),
            "NGN" => Ok(CurrencyCode::Ngn),
            other => Err(EngineError::InvalidRequest(format!(
                "Unsupported currency code: {}",
                other
            ))),
        }
    }
}

//
// ================= Rates =================
//

/// A single directional exchange-rate quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateQuote {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
}

impl RateQuote {
    /// A quote is usable only when the rate is a finite positive number.
    pub fn is_usable(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0
    }
}

/// Both directional quotes the passive display and the rate intent need.
///
/// The two directions are sourced by independent API calls and are not
/// guaranteed to be reciprocals of each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatePair {
    #[serde(rename = "USD_NGN")]
    pub usd_ngn: f64,
    #[serde(rename = "NGN_USD")]
    pub ngn_usd: f64,
}

impl RatePair {
    /// Direct quote for a directional pair. Identity pairs are always 1.
    pub fn quote(&self, from: CurrencyCode, to: CurrencyCode) -> f64 {
        match (from, to) {
            (CurrencyCode::Usd, CurrencyCode::Ngn) => self.usd_ngn,
            (CurrencyCode::Ngn, CurrencyCode::Usd) => self.ngn_usd,
            (CurrencyCode::Usd, CurrencyCode::Usd) | (CurrencyCode::Ngn, CurrencyCode::Ngn) => 1.0,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.usd_ngn.is_finite()
            && self.usd_ngn > 0.0
            && self.ngn_usd.is_finite()
            && self.ngn_usd > 0.0
    }
}

/// Where the rate used by a conversion came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Identity,
    Live,
    Fallback,
    Unavailable,
}

//
// ================= Fees =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeeGroup {
    Customer,
    Business,
}

/// Category name → ordered fee line items.
pub type FeeCategories = BTreeMap<String, Vec<FeeLineItem>>;

/// One row of the fee table. `fee` is display text ("$2.00", "1.5%", "free");
/// only the lenient parser in `fees` ever interprets it numerically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeLineItem {
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Fee")]
    pub fee: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeSchedule {
    #[serde(rename = "Customer")]
    pub customer: FeeCategories,
    #[serde(rename = "Business")]
    pub business: FeeCategories,
}

impl FeeSchedule {
    pub fn group(&self, group: FeeGroup) -> &FeeCategories {
        match group {
            FeeGroup::Customer => &self.customer,
            FeeGroup::Business => &self.business,
        }
    }
}

/// Processing-fee overrides extracted from the live fee schedule.
/// `None` means the schedule was unavailable or lacked the entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessingFeeOverrides {
    pub usd_payout_24h: Option<f64>,
    pub ngn_wallet_funding: Option<f64>,
}

//
// ================= Conversion =================
//

/// User-entered conversion parameters. `amount` is `None` while the input
/// is empty; computation treats that as 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub amount: Option<f64>,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

/// Derived conversion outcome. Fees are denominated in the source currency;
/// gross and net amounts in the target currency.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ConversionResult {
    pub gross_amount: f64,
    pub swap_fee: f64,
    pub processing_fee: f64,
    pub net_amount: f64,
    pub effective_rate: f64,
    pub rate_source: RateSource,
}

impl ConversionResult {
    /// True when the arithmetic fell back from live data. Identity pairs
    /// need no live data and are not degraded.
    pub fn is_degraded(&self) -> bool {
        matches!(self.rate_source, RateSource::Fallback | RateSource::Unavailable)
    }

    /// Guards the degenerate zero-rate case so callers never present it
    /// as a valid result.
    pub fn is_usable(&self) -> bool {
        self.rate_source != RateSource::Unavailable
    }
}

//
// ================= Chat =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for FeeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeeGroup::Customer => "Customer",
            FeeGroup::Business => "Business",
        };
        write!(f, "{}", s)
    }
}
