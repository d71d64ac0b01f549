//! # Balance Calculator
//!
//! Walks a tour's expenses and payments and produces each traveler's net
//! position in base currency.
//!
//! ## Posting Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Record            Credit (+)                 Debit (−)                 │
//! │  ───────────────   ────────────────────────   ────────────────────────  │
//! │  Expense           payer: expense in base     each split traveler:      │
//! │                                               split in base             │
//! │                                                                         │
//! │  PaymentRecord     sender: amount in base     receiver: amount in base  │
//! │                                                                         │
//! │  Base amount of an expense:  base_amount  ──or──  to_base(amount)       │
//! │                                                                         │
//! │  Base amount of a split:     split.base_amount                          │
//! │                       ──or── amount × expense.base_amount / expense.amount│
//! │                       ──or── to_base(split.amount)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Intermediate values keep full decimal precision; each final balance is
//! rounded to cents once. Splits that add up to their expense therefore
//! cancel exactly, whatever currency they were logged in.

use tracing::debug;

use crate::config::{SettlementConfig, UnknownTravelerPolicy};
use crate::currency::to_base_unrounded;
use crate::money::Money;
use crate::types::{Balances, Expense, ExpenseSplit, Tour};

/// Net balance per traveler using the default configuration.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tripsplit_core::{calculate_balances, Expense, ExpenseCategory, ExpenseSplit, Money, Tour, Traveler};
///
/// let mut tour = Tour::new("t1", "Hike", "USD");
/// tour.travelers = vec![Traveler::new("alice", "Alice"), Traveler::new("bob", "Bob")];
/// tour.expenses.push(Expense {
///     id: "e1".into(),
///     description: "Cabin".into(),
///     amount: Money::from_cents(200_00),
///     currency_code: "USD".into(),
///     base_amount: None,
///     date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
///     paid_by_id: "alice".into(),
///     category: ExpenseCategory::Accommodation,
///     splits: vec![
///         ExpenseSplit::new("alice", Money::from_cents(100_00)),
///         ExpenseSplit::new("bob", Money::from_cents(100_00)),
///     ],
/// });
///
/// let balances = calculate_balances(&tour);
/// assert_eq!(balances["alice"], Money::from_cents(100_00));
/// assert_eq!(balances["bob"], Money::from_cents(-100_00));
/// ```
pub fn calculate_balances(tour: &Tour) -> Balances {
    calculate_balances_with(tour, &SettlementConfig::default())
}

/// Net balance per traveler.
///
/// Every traveler of the tour appears in the result, including those with no
/// activity. Ids referenced by records but absent from the tour are handled
/// per `config.unknown_travelers`.
pub fn calculate_balances_with(tour: &Tour, config: &SettlementConfig) -> Balances {
    let mut balances: Balances = tour
        .travelers
        .iter()
        .map(|t| (t.id.clone(), Money::zero()))
        .collect();

    for expense in &tour.expenses {
        let paid = expense_base_amount(expense, tour);
        post(&mut balances, config, &expense.paid_by_id, paid);

        for split in &expense.splits {
            let owed = split_base_amount(split, expense, tour);
            post(&mut balances, config, &split.traveler_id, -owed);
        }
    }

    for payment in &tour.payments {
        let amount = to_base_unrounded(payment.amount, &payment.currency_code, tour);
        // Paying off a debt moves the sender up and the receiver down.
        post(&mut balances, config, &payment.from_traveler_id, amount);
        post(&mut balances, config, &payment.to_traveler_id, -amount);
    }

    for balance in balances.values_mut() {
        *balance = balance.round2();
    }

    debug!(
        tour_id = %tour.id,
        travelers = balances.len(),
        expenses = tour.expenses.len(),
        payments = tour.payments.len(),
        "Calculated balances"
    );

    balances
}

/// Expense amount in base currency; the cached `base_amount` wins.
pub(crate) fn expense_base_amount(expense: &Expense, tour: &Tour) -> Money {
    match expense.base_amount {
        Some(base) => base,
        None => to_base_unrounded(expense.amount, &expense.currency_code, tour),
    }
}

/// Split amount in base currency.
pub(crate) fn split_base_amount(split: &ExpenseSplit, expense: &Expense, tour: &Tour) -> Money {
    if let Some(base) = split.base_amount {
        return base;
    }

    // Scale by the rate frozen into the expense when it was created.
    if let Some(expense_base) = expense.base_amount {
        if let Some(ratio) = expense_base.amount().checked_div(expense.amount.amount()) {
            return split.amount * ratio;
        }
    }

    to_base_unrounded(split.amount, &expense.currency_code, tour)
}

fn post(balances: &mut Balances, config: &SettlementConfig, traveler_id: &str, amount: Money) {
    if let Some(balance) = balances.get_mut(traveler_id) {
        *balance += amount;
        return;
    }

    match config.unknown_travelers {
        UnknownTravelerPolicy::Include => {
            debug!(traveler_id, "Posting to traveler missing from tour");
            balances.insert(traveler_id.to_string(), amount);
        }
        UnknownTravelerPolicy::Ignore => {
            debug!(traveler_id, amount = %amount, "Skipping posting for unknown traveler");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
