//! # Traveler Summary
//!
//! The "paid / owed / net" breakdown behind the tour overview screen.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┬──────────┐
//! │ Traveler │   Paid   │   Owed   │   Sent   │ Received │   Net    │
//! ├──────────┼──────────┼──────────┼──────────┼──────────┼──────────┤
//! │ Alice    │   300.00 │   100.00 │     0.00 │    50.00 │   250.00 │
//! │ Bob      │     0.00 │   100.00 │    50.00 │     0.00 │  -150.00 │
//! └──────────┴──────────┴──────────┴──────────┴──────────┴──────────┘
//!   net = paid − owed + sent − received   (same figure as the balance map)
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::balance::{expense_base_amount, split_base_amount};
use crate::currency::to_base_unrounded;
use crate::money::Money;
use crate::types::{Tour, TravelerId};

/// One row of the overview table, all amounts in base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TravelerSummary {
    pub traveler_id: TravelerId,
    pub name: String,
    /// Expenses this traveler paid for.
    pub paid: Money,
    /// This traveler's shares of all expenses.
    pub owed: Money,
    /// Direct payments made to other travelers.
    pub sent: Money,
    /// Direct payments received from other travelers.
    pub received: Money,
    pub net: Money,
}

#[derive(Default)]
struct Totals {
    paid: Money,
    owed: Money,
    sent: Money,
    received: Money,
}

/// Builds one summary row per traveler, in the tour's traveler order.
///
/// Records naming travelers that are no longer on the tour do not get a row.
pub fn summarize(tour: &Tour) -> Vec<TravelerSummary> {
    let mut totals: HashMap<&str, Totals> = tour
        .travelers
        .iter()
        .map(|t| (t.id.as_str(), Totals::default()))
        .collect();

    for expense in &tour.expenses {
        if let Some(t) = totals.get_mut(expense.paid_by_id.as_str()) {
            t.paid += expense_base_amount(expense, tour);
        }
        for split in &expense.splits {
            if let Some(t) = totals.get_mut(split.traveler_id.as_str()) {
                t.owed += split_base_amount(split, expense, tour);
            }
        }
    }

    for payment in &tour.payments {
        let amount = to_base_unrounded(payment.amount, &payment.currency_code, tour);
        if let Some(t) = totals.get_mut(payment.from_traveler_id.as_str()) {
            t.sent += amount;
        }
        if let Some(t) = totals.get_mut(payment.to_traveler_id.as_str()) {
            t.received += amount;
        }
    }

    tour.travelers
        .iter()
        .map(|traveler| {
            let t = totals.remove(traveler.id.as_str()).unwrap_or_default();
            TravelerSummary {
                traveler_id: traveler.id.clone(),
                name: traveler.name.clone(),
                paid: t.paid.round2(),
                owed: t.owed.round2(),
                sent: t.sent.round2(),
                received: t.received.round2(),
                net: (t.paid - t.owed + t.sent - t.received).round2(),
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
