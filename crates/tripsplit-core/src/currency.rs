//! # Currency Normalizer
//!
//! Converts amounts between a tour's currencies and its base currency using
//! the flat per-currency rate stored on the tour.
//!
//! ## Conversion Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   90 EUR ──► to_base() ──► ÷ 0.9 ──► 100.00 USD                         │
//! │                                                                         │
//! │   100 USD ──► to_target("EUR") ──► × 0.9 ──► 90.00 EUR                  │
//! │                                                                         │
//! │   JPY ──► convert("JPY", "EUR") ──► JPY→USD ──► USD→EUR                 │
//! │           (only ever through base, no direct cross rates)               │
//! │                                                                         │
//! │   Unknown code ──► amount unchanged + warning   (soft variants)         │
//! │                └──► CoreError::CurrencyNotFound (try_ variants)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why fail soft?
//! Balances feed informational screens. An approximate figure with a logged
//! warning is more useful there than an error that blanks the whole view.
//! Callers that need a hard guarantee use the `try_` functions.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Tour;

// =============================================================================
// Rate Lookup
// =============================================================================

/// Returns the rate of a non-base currency, checking the `rate > 0` invariant.
fn foreign_rate(code: &str, tour: &Tour) -> CoreResult<Decimal> {
    let currency = tour
        .currency(code)
        .ok_or_else(|| CoreError::CurrencyNotFound {
            code: code.to_string(),
            tour_id: tour.id.clone(),
        })?;

    if currency.exchange_rate <= Decimal::ZERO {
        return Err(invalid_rate(code, currency.exchange_rate));
    }

    Ok(currency.exchange_rate)
}

fn invalid_rate(code: &str, rate: Decimal) -> CoreError {
    CoreError::InvalidExchangeRate {
        code: code.to_string(),
        rate: rate.to_string(),
    }
}

fn is_base(code: &str, tour: &Tour) -> bool {
    code == tour.base_currency_code
}

// =============================================================================
// Foreign → Base
// =============================================================================

/// Converts to base currency at full precision.
fn try_to_base_exact(amount: Money, code: &str, tour: &Tour) -> CoreResult<Money> {
    if is_base(code, tour) {
        return Ok(amount);
    }

    let rate = foreign_rate(code, tour)?;
    amount
        .checked_div(rate)
        .ok_or_else(|| invalid_rate(code, rate))
}

/// Strict conversion into the tour's base currency, rounded to 2 places.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tripsplit_core::{currency::try_to_base, Currency, Money, Tour};
///
/// let mut tour = Tour::new("t1", "Paris", "USD");
/// tour.currencies.push(Currency::new("EUR", "Euro", dec!(0.9)));
///
/// let usd = try_to_base(Money::new(dec!(90)), "EUR", &tour).unwrap();
/// assert_eq!(usd.amount(), dec!(100));
/// assert!(try_to_base(Money::new(dec!(1)), "GBP", &tour).is_err());
/// ```
pub fn try_to_base(amount: Money, code: &str, tour: &Tour) -> CoreResult<Money> {
    if is_base(code, tour) {
        return Ok(amount);
    }
    try_to_base_exact(amount, code, tour).map(|m| m.round2())
}

/// Converts into the tour's base currency, falling back to the unconverted
/// amount when the currency cannot be resolved.
pub fn to_base(amount: Money, code: &str, tour: &Tour) -> Money {
    try_to_base(amount, code, tour).unwrap_or_else(|err| fallback(amount, code, tour, err))
}

/// Same as [`to_base`] but without rounding, for sums that are rounded once
/// at the end.
pub(crate) fn to_base_unrounded(amount: Money, code: &str, tour: &Tour) -> Money {
    try_to_base_exact(amount, code, tour).unwrap_or_else(|err| fallback(amount, code, tour, err))
}

// =============================================================================
// Base → Foreign
// =============================================================================

/// Strict conversion from base currency into `code`, rounded to 2 places.
pub fn try_to_target(amount: Money, code: &str, tour: &Tour) -> CoreResult<Money> {
    if is_base(code, tour) {
        return Ok(amount);
    }

    let rate = foreign_rate(code, tour)?;
    amount
        .checked_mul(rate)
        .map(|m| m.round2())
        .ok_or_else(|| invalid_rate(code, rate))
}

/// Converts from base currency into `code`, falling back to the unconverted
/// amount when the currency cannot be resolved.
pub fn to_target(amount: Money, code: &str, tour: &Tour) -> Money {
    try_to_target(amount, code, tour).unwrap_or_else(|err| fallback(amount, code, tour, err))
}

// =============================================================================
// Cross Conversion
// =============================================================================

/// Converts between two tour currencies by way of the base currency.
///
/// Rounds once, after both legs.
pub fn convert(amount: Money, from: &str, to: &str, tour: &Tour) -> Money {
    if from == to {
        return amount;
    }

    let base = to_base_unrounded(amount, from, tour);
    if is_base(to, tour) {
        return base.round2();
    }

    let converted = foreign_rate(to, tour).and_then(|rate| {
        base.checked_mul(rate)
            .ok_or_else(|| invalid_rate(to, rate))
    });

    match converted {
        Ok(converted) => converted.round2(),
        Err(err) => fallback(base.round2(), to, tour, err),
    }
}

fn fallback(amount: Money, code: &str, tour: &Tour, err: CoreError) -> Money {
    warn!(
        tour_id = %tour.id,
        currency = %code,
        amount = %amount,
        error = %err,
        "Currency not resolvable, using unconverted amount"
    );
    amount
}

// =============================================================================
// Unit Tests
// =============================================================================
