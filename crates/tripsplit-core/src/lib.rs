//! # tripsplit-core: Settlement Engine for Shared Tour Expenses
//!
//! Travelers log expenses in whatever currency they paid in. This crate
//! works out where everyone stands and the fewest transfers that square
//! everybody up. All business logic is pure, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tripsplit Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend + Storage                           │   │
//! │  │    Expense form ──► Tour snapshot ──► Settlements / Overview    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Tour (JSON or Rust)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tripsplit-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │ currency  │─►│  balance  │─►│ settlement │  │ summary  │  │   │
//! │  │   │ to_base   │  │ net per   │  │ greedy     │  │ paid/owed│  │   │
//! │  │   │ to_target │  │ traveler  │  │ netting    │  │ /net     │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Tour, Traveler, Currency, Expense, PaymentRecord, Settlement
//! - [`money`] - Decimal money type and cent rounding
//! - [`currency`] - Conversion to and from the base currency
//! - [`balance`] - Net balance per traveler
//! - [`settlement`] - Minimal transfer plan
//! - [`summary`] - Paid / owed / net overview rows
//! - [`validation`] - Boundary checks for tour data
//! - [`config`] - Engine options
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same Tour in, same balances and plan out
//! 2. **No I/O**: storage and rendering live with the callers
//! 3. **Decimal Money**: no binary floating point anywhere in the math
//! 4. **Fail Soft**: calculations degrade and log, they never error
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tripsplit_core::{
//!     calculate_settlements, Currency, Expense, ExpenseCategory, ExpenseSplit, Money, Tour,
//!     Traveler,
//! };
//!
//! let mut tour = Tour::new("t1", "Vienna", "USD");
//! tour.currencies.push(Currency::new("EUR", "Euro", dec!(0.9)));
//! tour.travelers = vec![Traveler::new("alice", "Alice"), Traveler::new("bob", "Bob")];
//! tour.expenses.push(Expense {
//!     id: "e1".into(),
//!     description: "Opera tickets".into(),
//!     amount: Money::new(dec!(90)),
//!     currency_code: "EUR".into(),
//!     base_amount: None,
//!     date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     paid_by_id: "bob".into(),
//!     category: ExpenseCategory::Activities,
//!     splits: vec![
//!         ExpenseSplit::new("alice", Money::new(dec!(45))),
//!         ExpenseSplit::new("bob", Money::new(dec!(45))),
//!     ],
//! });
//!
//! let plan = calculate_settlements(&tour);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].from, "alice");
//! assert_eq!(plan[0].amount, Money::new(dec!(50)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod config;
pub mod currency;
pub mod error;
pub mod money;
pub mod settlement;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tripsplit_core::Money` instead of
// `use tripsplit_core::money::Money`

pub use balance::{calculate_balances, calculate_balances_with};
pub use config::{MatchingStrategy, SettlementConfig, UnknownTravelerPolicy};
pub use currency::{convert, to_base, to_target, try_to_base, try_to_target};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, SETTLEMENT_TOLERANCE};
pub use settlement::{calculate_settlements, calculate_settlements_with, plan_settlements};
pub use summary::{summarize, TravelerSummary};
pub use types::*;
