//! # Domain Types
//!
//! The tour snapshot the engine computes over, and what it hands back.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Tour                                       │
//! │   id, name, base_currency_code                                          │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Traveler     │   │    Currency     │   │     Expense     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  code (EUR)     │   │  amount         │       │
//! │  │  name           │   │  exchange_rate  │   │  currency_code  │       │
//! │  └─────────────────┘   └─────────────────┘   │  paid_by_id     │       │
//! │                                              │  splits[] ──────┼──┐    │
//! │  ┌─────────────────┐                         │  base_amount?   │  │    │
//! │  │  PaymentRecord  │                         └─────────────────┘  │    │
//! │  │  ─────────────  │                         ┌─────────────────┐  │    │
//! │  │  from → to      │                         │  ExpenseSplit   │◄─┘    │
//! │  │  amount, code   │                         │  traveler_id    │       │
//! │  └─────────────────┘                         │  amount, base?  │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  Derived (never stored):  Balances, Settlement, TravelerSummary        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Every type serializes with camelCase field names, the way the web
//! frontend keeps its tour state, so a stored snapshot can be handed to
//! [`Tour::from_json`] as-is.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::Money;

/// Traveler identifier as issued by the storage layer.
pub type TravelerId = String;

/// Net position per traveler in the tour's base currency.
///
/// Positive = is owed money, negative = owes money. Ordered by traveler id so
/// every consumer iterates it the same way.
pub type Balances = BTreeMap<TravelerId, Money>;

// =============================================================================
// Traveler
// =============================================================================

/// A participant in a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: TravelerId,
    pub name: String,
}

impl Traveler {
    pub fn new(id: impl Into<TravelerId>, name: impl Into<String>) -> Self {
        Traveler {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Currency
// =============================================================================

/// A currency accepted on a tour.
///
/// ## Exchange Rate Direction
/// ```text
/// 1 unit of base currency  =  exchange_rate units of this currency
///
///   base → this :  amount × exchange_rate
///   this → base :  amount ÷ exchange_rate
///
/// Example (base USD):  EUR rate 0.9   →   90 EUR = 100 USD
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// ISO-style 3-letter code, unique within the tour.
    pub code: String,

    /// Display name ("Euro").
    pub name: String,

    /// Units of this currency per 1 unit of base currency. Always > 0.
    #[ts(type = "number")]
    pub exchange_rate: Decimal,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>, exchange_rate: Decimal) -> Self {
        Currency {
            code: code.into(),
            name: name.into(),
            exchange_rate,
        }
    }
}

// =============================================================================
// Expense Category
// =============================================================================

/// What an expense was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Activities,
    Shopping,
    /// Anything else, including categories this build does not know about.
    #[default]
    #[serde(other)]
    Other,
}

// =============================================================================
// Expense Split
// =============================================================================

/// One traveler's share of an expense.
///
/// `amount` is in the parent expense's currency. `base_amount`, when present,
/// is the same share already converted to the tour's base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub traveler_id: TravelerId,

    pub amount: Money,

    /// Share of the expense in percent, when split by percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub percentage: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<Money>,
}

impl ExpenseSplit {
    pub fn new(traveler_id: impl Into<TravelerId>, amount: Money) -> Self {
        ExpenseSplit {
            traveler_id: traveler_id.into(),
            amount,
            percentage: None,
            base_amount: None,
        }
    }

    /// Attaches a pre-computed base-currency amount.
    pub fn with_base_amount(mut self, base_amount: Money) -> Self {
        self.base_amount = Some(base_amount);
        self
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Money spent by one traveler on behalf of one or more travelers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub amount: Money,

    pub currency_code: String,

    /// Amount converted to base currency when the expense was created.
    /// Authoritative when present: rates may have changed since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<Money>,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub paid_by_id: TravelerId,

    #[serde(default)]
    pub category: ExpenseCategory,

    pub splits: Vec<ExpenseSplit>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a direct payment between travelers was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash handed over.
    #[default]
    Cash,
    BankTransfer,
    Card,
    MobileWallet,
    #[serde(other)]
    Other,
}

// =============================================================================
// Payment Record
// =============================================================================

/// A settlement transfer already made outside the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub from_traveler_id: TravelerId,
    pub to_traveler_id: TravelerId,
    pub amount: Money,
    pub currency_code: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Settlement
// =============================================================================

/// A suggested transfer, always in the tour's base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: TravelerId,
    pub to: TravelerId,
    pub amount: Money,
    pub currency_code: String,
}

impl Settlement {
    /// Turns the suggestion into a ledger entry once the debtor has paid.
    ///
    /// ## User Workflow
    /// ```text
    /// Settlements view: "Bob pays Alice 100.00 USD"  [Record Payment]
    ///      │
    ///      ▼
    /// into_payment(today, Cash, None) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// PaymentRecord stored by the caller → next calculation nets it out
    /// ```
    pub fn into_payment(
        self,
        date: NaiveDate,
        method: PaymentMethod,
        notes: Option<String>,
    ) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4().to_string(),
            from_traveler_id: self.from,
            to_traveler_id: self.to,
            amount: self.amount,
            currency_code: self.currency_code,
            date,
            method,
            notes,
        }
    }
}

// =============================================================================
// Tour
// =============================================================================

/// The aggregate every calculation is scoped to.
///
/// ## Invariant
/// `currencies` contains `base_currency_code` with an exchange rate of
/// exactly 1. The engine does not enforce it; see
/// [`crate::validation::validate_tour`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub name: String,
    pub base_currency_code: String,
    #[serde(default)]
    pub travelers: Vec<Traveler>,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Tour {
    /// Creates an empty tour whose only currency is the base currency.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_currency_code: impl Into<String>,
    ) -> Self {
        let base_currency_code = base_currency_code.into();
        Tour {
            id: id.into(),
            name: name.into(),
            currencies: vec![Currency::new(
                base_currency_code.clone(),
                base_currency_code.clone(),
                Decimal::ONE,
            )],
            base_currency_code,
            travelers: Vec::new(),
            expenses: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Parses a snapshot in the frontend's JSON shape.
    pub fn from_json(json: &str) -> CoreResult<Tour> {
        Ok(serde_json::from_str(json)?)
    }

    /// Looks up a currency by code.
    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Looks up a traveler by id.
    pub fn traveler(&self, id: &str) -> Option<&Traveler> {
        self.travelers.iter().find(|t| t.id == id)
    }

    /// Returns true if `id` belongs to a traveler of this tour.
    pub fn has_traveler(&self, id: &str) -> bool {
        self.traveler(id).is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
