//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Converting 90 EUR at rate 0.9 with binary floats:                      │
//! │    90 / 0.9 = 99.99999999999999     → rounds away a cent                │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal                                          │
//! │    90 / 0.9 = 100 exactly                                               │
//! │    Rounding to cents happens at known points, never by accident        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Integer cents are not enough here: exchange rates such as `0.9` or
//! `157.32` make intermediate values fractional, so the engine keeps full
//! decimal precision until it rounds with [`Money::round2`].
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use tripsplit_core::money::Money;
//!
//! let dinner = Money::new(dec!(120.50));
//! let share = Money::new(dec!(40.17));
//!
//! assert_eq!((dinner - share).amount(), dec!(80.33));
//! assert_eq!(Money::new(dec!(33.335)).round2().amount(), dec!(33.34));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Amounts whose magnitude is at or below this value are treated as settled.
///
/// Matches the smallest unit the frontend displays (one cent of the base
/// currency).
pub const SETTLEMENT_TOLERANCE: Money = Money::from_cents(1);

/// Number of decimal places every displayed amount is rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value, signed, in whatever currency the context says.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values are debts in a balance map
/// - **Single field tuple struct**: serializes as a plain JSON number
/// - **No currency tag**: the owning Expense/Payment/Tour carries the code
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Expense.amount ──┬──► to_base() ──► Balance (paid side)                │
/// │                   │                                                     │
/// │  Split.amount ────┴──► to_base() ──► Balance (owed side)                │
/// │                                                                         │
/// │  Balances ──► Settlement planner ──► Settlement.amount                  │
/// │                                                                         │
/// │  EVERY monetary value in the engine flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use tripsplit_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).amount(), dec!(10.99));
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(Decimal::from_parts(
            cents.unsigned_abs() as u32,
            (cents.unsigned_abs() >> 32) as u32,
            0,
            cents < 0,
            MONEY_DECIMAL_PLACES,
        ))
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use tripsplit_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).amount(), dec!(10.99));
    /// assert_eq!(Money::from_major_minor(-5, 50).amount(), dec!(-5.50));
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns true when `|self| <= SETTLEMENT_TOLERANCE`.
    ///
    /// ```rust
    /// use tripsplit_core::money::Money;
    ///
    /// assert!(Money::from_cents(-1).is_negligible());
    /// assert!(!Money::from_cents(2).is_negligible());
    /// ```
    #[inline]
    pub fn is_negligible(&self) -> bool {
        self.abs() <= SETTLEMENT_TOLERANCE
    }

    /// Rounds to 2 decimal places, half away from zero.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  HALF AWAY FROM ZERO                                                │
    /// │                                                                     │
    /// │   33.335 → 33.34      -33.335 → -33.34                             │
    /// │   33.334 → 33.33      -33.334 → -33.33                             │
    /// │                                                                     │
    /// │  Symmetric for debts and credits, so a balance and its mirror      │
    /// │  image always round to the same magnitude.                         │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    #[inline]
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Divides by a rate, returning `None` for a zero divisor.
    #[inline]
    pub fn checked_div(&self, rate: Decimal) -> Option<Money> {
        self.0.checked_div(rate).map(Money)
    }

    /// Multiplies by a rate, returning `None` on overflow.
    #[inline]
    pub fn checked_mul(&self, rate: Decimal) -> Option<Money> {
        self.0.checked_mul(rate).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two decimals and no currency symbol.
///
/// ## Note
/// The currency code lives on the owning record; the frontend adds symbols.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Scaling by a ratio (proportional split of a cached base amount).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
