//! Exchange-rate quotes and USD to millisatoshi conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::unix_time;

/// Millisatoshis in one whole bitcoin (10^8 sats of 10^3 msats each).
pub const MSATS_PER_BTC: f64 = 100_000_000_000.0;

/// Where a [`RateQuote`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Fetched from one of the vendor's rate endpoints.
    Live,
    /// Statically configured rate used because every live source failed.
    Fallback,
}

/// A BTC/USD exchange rate resolved for a single deposit request.
///
/// Quotes are created fresh per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// USD per one whole BTC. Finite and strictly positive.
    pub rate: f64,
    /// Origin of the rate.
    pub source: RateSource,
    /// Unix seconds at which the rate was resolved.
    pub fetched_at: u64,
}

impl RateQuote {
    /// Quote taken from a live vendor response.
    ///
    /// Returns `None` unless `rate` is finite and strictly positive; a
    /// vendor payload claiming a zero or negative rate is unparseable,
    /// not a valid quote.
    pub fn live(rate: f64) -> Option<Self> {
        Self::with_source(rate, RateSource::Live)
    }

    /// Quote taken from the configured static fallback rate.
    pub fn fallback(rate: f64) -> Option<Self> {
        Self::with_source(rate, RateSource::Fallback)
    }

    fn with_source(rate: f64, source: RateSource) -> Option<Self> {
        if rate.is_finite() && rate > 0.0 {
            Some(Self {
                rate,
                source,
                fetched_at: unix_time(),
            })
        } else {
            None
        }
    }

    /// True when the quote did not come from a live source and converted
    /// amounts may be inaccurate.
    pub fn is_stale(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

/// Result of converting a USD amount into invoice units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    /// The caller-supplied USD amount.
    pub amount_usd: f64,
    /// `amount_usd / rate`, in whole BTC.
    pub amount_btc: f64,
    /// `amount_btc` expressed in millisatoshis, rounded half away from zero.
    pub msats: u64,
}

/// Reasons a conversion is rejected before any invoice is requested.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AmountError {
    /// The caller supplied a USD amount that is not a positive finite number.
    #[error("a valid USD amount is required, got {0}")]
    InvalidUsdAmount(f64),
    /// The conversion rounds to zero msats or falls outside the invoice unit.
    #[error("{0} USD converts outside the invoiceable range")]
    AmountOutOfRange(f64),
}

/// Convert a USD amount into BTC and millisatoshis at the given rate.
///
/// Pure arithmetic, no I/O. Rounds to the nearest millisatoshi, half away
/// from zero.
///
/// # Errors
///
/// [`AmountError::InvalidUsdAmount`] for non-finite or non-positive input;
/// [`AmountError::AmountOutOfRange`] when the msat value rounds to zero
/// (deposits too small to invoice) or does not fit the invoice unit.
pub fn convert_usd(amount_usd: f64, rate: &RateQuote) -> Result<Conversion, AmountError> {
    if !amount_usd.is_finite() || amount_usd <= 0.0 {
        return Err(AmountError::InvalidUsdAmount(amount_usd));
    }

    let amount_btc = amount_usd / rate.rate;
    let msats = (amount_btc * MSATS_PER_BTC).round();

    if !msats.is_finite() || msats < 1.0 || msats > u64::MAX as f64 {
        return Err(AmountError::AmountOutOfRange(amount_usd));
    }

    Ok(Conversion {
        amount_usd,
        amount_btc,
        msats: msats as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_rate(rate: f64) -> RateQuote {
        RateQuote::live(rate).expect("valid rate")
    }

    #[test]
    fn converts_25_usd_at_50k() {
        let conversion = convert_usd(25.0, &live_rate(50_000.0)).expect("converts");

        assert_eq!(conversion.msats, 50_000_000);
        assert!((conversion.amount_btc - 0.0005).abs() < 1e-12);
        assert_eq!(conversion.amount_usd, 25.0);
    }

    #[test]
    fn rounds_to_nearest_msat() {
        // 1 USD at 65 000 USD/BTC is 1538461.538... msats.
        let conversion = convert_usd(1.0, &live_rate(65_000.0)).expect("converts");
        assert_eq!(conversion.msats, 1_538_462);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let rate = live_rate(50_000.0);
        assert_eq!(
            convert_usd(0.0, &rate),
            Err(AmountError::InvalidUsdAmount(0.0))
        );
        assert_eq!(
            convert_usd(-5.0, &rate),
            Err(AmountError::InvalidUsdAmount(-5.0))
        );
    }

    #[test]
    fn rejects_non_finite_amounts() {
        let rate = live_rate(50_000.0);
        assert!(convert_usd(f64::NAN, &rate).is_err());
        assert!(convert_usd(f64::INFINITY, &rate).is_err());
    }

    #[test]
    fn rejects_amounts_that_round_to_zero_msats() {
        // A nano-dollar deposit is below one msat at any plausible rate.
        let rate = live_rate(100_000.0);
        assert_eq!(
            convert_usd(1e-9, &rate),
            Err(AmountError::AmountOutOfRange(1e-9))
        );
    }

    #[test]
    fn rejects_overflowing_conversions() {
        // A corrupted near-zero rate blows the conversion past the unit range.
        let rate = live_rate(1e-300);
        assert!(matches!(
            convert_usd(1e30, &rate),
            Err(AmountError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn quote_constructors_reject_bad_rates() {
        assert!(RateQuote::live(0.0).is_none());
        assert!(RateQuote::live(-65_000.0).is_none());
        assert!(RateQuote::live(f64::NAN).is_none());
        assert!(RateQuote::fallback(f64::INFINITY).is_none());
        assert!(RateQuote::fallback(100_000.0).is_some());
    }

    #[test]
    fn fallback_quotes_are_stale() {
        assert!(RateQuote::fallback(100_000.0).expect("valid").is_stale());
        assert!(!live_rate(100_000.0).is_stale());
    }
}
