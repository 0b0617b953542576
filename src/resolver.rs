//! Conversion arithmetic
//!
//! Pure rate selection and fee computation. Data availability never turns
//! into an error here: the rate falls back deterministically and the result
//! carries the provenance of whatever was used, so the caller can surface an
//! advisory note without losing the numbers.

use crate::models::{
    ConversionRequest, ConversionResult, CurrencyCode, ProcessingFeeOverrides, RateQuote,
    RateSource,
};
use crate::rates;

/// Flat percentage charged on the source amount.
pub const SWAP_FEE_RATE: f64 = 0.005;

/// Default flat charge for USD-source transfers when the live schedule
/// offers no override.
pub const DEFAULT_USD_PROCESSING_FEE: f64 = 2.0;

/// Live inputs the caller assembled before resolving. `rate` is the quote
/// for the exact directional pair requested, or `None` when the call failed,
/// was skipped, or returned a non-numeric rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveData {
    pub rate: Option<RateQuote>,
    pub fees: ProcessingFeeOverrides,
}

/// Resolve a conversion to net payout, itemized fees and the effective rate.
///
/// Fees are denominated in the source currency and converted at the resolved
/// rate before subtraction; the net amount is clamped at zero.
pub fn resolve_conversion(request: &ConversionRequest, live: &LiveData) -> ConversionResult {
    let amount = request.amount.unwrap_or(0.0);

    let (rate, rate_source) = if request.from == request.to {
        (1.0, RateSource::Identity)
    } else if let Some(quote) = live
        .rate
        .filter(|q| q.from == request.from && q.to == request.to && q.is_usable())
    {
        // A direct live quote always wins; reciprocals are never substituted.
        (quote.rate, RateSource::Live)
    } else {
        let fallback = rates::fallback_quote(request.from, request.to);
        if fallback.is_usable() {
            (fallback.rate, RateSource::Fallback)
        } else {
            (0.0, RateSource::Unavailable)
        }
    };

    let swap_fee = amount * SWAP_FEE_RATE;

    // Flat per-transaction charge keyed on the source currency; corridors
    // outside USD/NGN would carry no processing fee.
    let processing_fee = match request.from {
        CurrencyCode::Usd => live.fees.usd_payout_24h.unwrap_or(DEFAULT_USD_PROCESSING_FEE),
        CurrencyCode::Ngn => live.fees.ngn_wallet_funding.unwrap_or(0.0),
    };

    let gross_amount = amount * rate;
    let net_amount = (gross_amount - (swap_fee + processing_fee) * rate).max(0.0);

    ConversionResult {
        gross_amount,
        swap_fee,
        processing_fee,
        net_amount,
        effective_rate: rate,
        rate_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64, from: CurrencyCode, to: CurrencyCode) -> ConversionRequest {
        ConversionRequest {
            amount: Some(amount),
            from,
            to,
        }
    }

    #[test]
    fn test_identity_pair_uses_unit_rate() {
        let result = resolve_conversion(
            &request(100.0, CurrencyCode::Usd, CurrencyCode::Usd),
            &LiveData::default(),
        );

        assert_eq!(result.effective_rate, 1.0);
        assert_eq!(result.rate_source, RateSource::Identity);
        assert_eq!(result.swap_fee, 0.5);
        assert_eq!(result.processing_fee, DEFAULT_USD_PROCESSING_FEE);
        assert_eq!(result.net_amount, 100.0 - 2.5);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_usd_to_ngn_without_live_data() {
        let result = resolve_conversion(
            &request(1000.0, CurrencyCode::Usd, CurrencyCode::Ngn),
            &LiveData::default(),
        );

        let fallback = rates::fallback_quote(CurrencyCode::Usd, CurrencyCode::Ngn).rate;

        assert_eq!(result.swap_fee, 5.0);
        assert_eq!(result.processing_fee, 2.0);
        assert_eq!(result.effective_rate, fallback);
        assert_eq!(result.rate_source, RateSource::Fallback);
        assert_eq!(result.net_amount, (1000.0 * fallback - 7.0 * fallback).max(0.0));
        assert!(result.is_degraded());
    }

    #[test]
    fn test_live_rate_example() {
        let live = LiveData {
            rate: Some(RateQuote {
                from: CurrencyCode::Usd,
                to: CurrencyCode::Ngn,
                rate: 1480.0,
            }),
            fees: ProcessingFeeOverrides::default(),
        };

        let result = resolve_conversion(&request(100.0, CurrencyCode::Usd, CurrencyCode::Ngn), &live);

        assert_eq!(result.swap_fee, 0.5);
        assert_eq!(result.processing_fee, 2.0);
        assert_eq!(result.net_amount, 100.0 * 1480.0 - 2.5 * 1480.0);
        assert_eq!(result.net_amount, 144_260.0);
        assert_eq!(result.rate_source, RateSource::Live);
    }

    #[test]
    fn test_api_fee_overrides_take_precedence() {
        let live = LiveData {
            rate: None,
            fees: ProcessingFeeOverrides {
                usd_payout_24h: Some(3.5),
                ngn_wallet_funding: Some(150.0),
            },
        };

        let usd = resolve_conversion(&request(100.0, CurrencyCode::Usd, CurrencyCode::Ngn), &live);
        assert_eq!(usd.processing_fee, 3.5);

        let ngn = resolve_conversion(&request(10_000.0, CurrencyCode::Ngn, CurrencyCode::Usd), &live);
        assert_eq!(ngn.processing_fee, 150.0);
    }

    #[test]
    fn test_ngn_source_defaults_to_zero_processing_fee() {
        let result = resolve_conversion(
            &request(10_000.0, CurrencyCode::Ngn, CurrencyCode::Usd),
            &LiveData::default(),
        );

        assert_eq!(result.processing_fee, 0.0);
    }

    #[test]
    fn test_net_amount_clamped_at_zero() {
        // Fees exceed the converted amount for tiny transfers.
        let result = resolve_conversion(
            &request(1.0, CurrencyCode::Usd, CurrencyCode::Ngn),
            &LiveData::default(),
        );

        assert_eq!(result.net_amount, 0.0);
    }

    #[test]
    fn test_absent_amount_computes_as_zero() {
        let result = resolve_conversion(
            &ConversionRequest {
                amount: None,
                from: CurrencyCode::Usd,
                to: CurrencyCode::Ngn,
            },
            &LiveData::default(),
        );

        assert_eq!(result.swap_fee, 0.0);
        assert_eq!(result.gross_amount, 0.0);
        assert_eq!(result.net_amount, 0.0);
    }

    #[test]
    fn test_direct_quote_never_replaced_by_reciprocal() {
        // A live NGN->USD quote that is deliberately not 1/usd_ngn.
        let live = LiveData {
            rate: Some(RateQuote {
                from: CurrencyCode::Ngn,
                to: CurrencyCode::Usd,
                rate: 0.00061,
            }),
            fees: ProcessingFeeOverrides::default(),
        };

        let result = resolve_conversion(&request(50_000.0, CurrencyCode::Ngn, CurrencyCode::Usd), &live);

        assert_eq!(result.effective_rate, 0.00061);
        assert_eq!(result.rate_source, RateSource::Live);
    }

    #[test]
    fn test_wrong_direction_quote_is_ignored() {
        let live = LiveData {
            rate: Some(RateQuote {
                from: CurrencyCode::Usd,
                to: CurrencyCode::Ngn,
                rate: 1480.0,
            }),
            fees: ProcessingFeeOverrides::default(),
        };

        let result = resolve_conversion(&request(50_000.0, CurrencyCode::Ngn, CurrencyCode::Usd), &live);

        assert_eq!(result.rate_source, RateSource::Fallback);
    }

    #[test]
    fn test_non_finite_live_rate_falls_back() {
        let live = LiveData {
            rate: Some(RateQuote {
                from: CurrencyCode::Usd,
                to: CurrencyCode::Ngn,
                rate: f64::NAN,
            }),
            fees: ProcessingFeeOverrides::default(),
        };

        let result = resolve_conversion(&request(100.0, CurrencyCode::Usd, CurrencyCode::Ngn), &live);

        assert_eq!(result.rate_source, RateSource::Fallback);
        assert!(result.effective_rate.is_finite());
    }

    #[test]
    fn test_resolution_is_pure() {
        let req = request(250.0, CurrencyCode::Usd, CurrencyCode::Ngn);
        let live = LiveData {
            rate: Some(RateQuote {
                from: CurrencyCode::Usd,
                to: CurrencyCode::Ngn,
                rate: 1503.25,
            }),
            fees: ProcessingFeeOverrides {
                usd_payout_24h: Some(1.0),
                ngn_wallet_funding: None,
            },
        };

        let first = resolve_conversion(&req, &live);
        let second = resolve_conversion(&req, &live);

        assert_eq!(first, second);
    }
}
