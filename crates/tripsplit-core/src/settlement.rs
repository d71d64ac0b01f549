//! # Settlement Planner
//!
//! Turns a balance map into a short list of debtor → creditor transfers that
//! brings every balance to zero.
//!
//! ## Greedy Debt Netting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Balances:  Alice +200   Bob −100   Carol −100   Dave +0.004            │
//! │                                                                         │
//! │  1. Partition (ignoring |balance| ≤ 0.01)                               │
//! │       creditors: [Alice 200]                                            │
//! │       debtors:   [Bob 100, Carol 100]        (magnitudes)               │
//! │                                                                         │
//! │  2. Sort both largest first                                             │
//! │                                                                         │
//! │  3. Repeat while both lists are non-empty:                              │
//! │       transfer = min(debtor head, creditor head)                        │
//! │       emit  debtor ──transfer──► creditor                               │
//! │       shrink both heads, drop any head under one cent                   │
//! │                                                                         │
//! │  Result:  Bob → Alice 100,  Carol → Alice 100                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every iteration consumes at least one head completely, so the plan never
//! has more than `creditors + debtors − 1` transfers. Pennies left over from
//! rounding are dropped rather than carried.

use std::collections::VecDeque;

use tracing::debug;

use crate::balance::calculate_balances_with;
use crate::config::{MatchingStrategy, SettlementConfig};
use crate::money::Money;
use crate::types::{Balances, Settlement, Tour, TravelerId};

/// One side of a pending transfer: who, and how much is still open.
#[derive(Debug, Clone)]
struct OpenAmount {
    traveler_id: TravelerId,
    amount: Money,
}

/// Suggested transfers for a tour using the default configuration.
///
/// ## User Workflow
/// ```text
/// Settlements view opened
///      │
///      ▼
/// calculate_settlements(&tour) ← THIS FUNCTION
///      │
///      ├──► calculate_balances(&tour)
///      │
///      ▼
/// "Bob pays Alice 100.00 USD"   [Record Payment]
/// ```
pub fn calculate_settlements(tour: &Tour) -> Vec<Settlement> {
    calculate_settlements_with(tour, &SettlementConfig::default())
}

/// Suggested transfers for a tour.
pub fn calculate_settlements_with(tour: &Tour, config: &SettlementConfig) -> Vec<Settlement> {
    let balances = calculate_balances_with(tour, config);
    let settlements = plan_settlements(&balances, &tour.base_currency_code, config);

    debug!(
        tour_id = %tour.id,
        settlements = settlements.len(),
        strategy = %config.strategy,
        "Planned settlements"
    );

    settlements
}

/// Plans transfers for an already computed balance map.
///
/// Use this when the caller renders balances too and has computed them once.
/// All emitted settlements are in `currency_code`.
pub fn plan_settlements(
    balances: &Balances,
    currency_code: &str,
    config: &SettlementConfig,
) -> Vec<Settlement> {
    // A negative tolerance would let a settled traveler be both creditor and debtor.
    let tolerance = config.tolerance.max(Money::zero());

    let mut creditors: VecDeque<OpenAmount> = balances
        .iter()
        .filter(|(_, balance)| **balance > tolerance)
        .map(|(id, balance)| OpenAmount {
            traveler_id: id.clone(),
            amount: *balance,
        })
        .collect();

    let mut debtors: VecDeque<OpenAmount> = balances
        .iter()
        .filter(|(_, balance)| **balance < -tolerance)
        .map(|(id, balance)| OpenAmount {
            traveler_id: id.clone(),
            amount: -*balance,
        })
        .collect();

    sort_largest_first(&mut creditors);
    sort_largest_first(&mut debtors);

    let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());

    loop {
        let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut()) else {
            break;
        };

        let transfer = debtor.amount.min(creditor.amount);
        if transfer > tolerance {
            settlements.push(Settlement {
                from: debtor.traveler_id.clone(),
                to: creditor.traveler_id.clone(),
                amount: transfer.round2(),
                currency_code: currency_code.to_string(),
            });
        }

        debtor.amount -= transfer;
        creditor.amount -= transfer;

        let debtor_done = is_consumed(debtor.amount, tolerance);
        let creditor_done = is_consumed(creditor.amount, tolerance);

        if debtor_done {
            debtors.pop_front();
        }
        if creditor_done {
            creditors.pop_front();
        }

        if config.strategy == MatchingStrategy::Resort {
            sort_largest_first(&mut creditors);
            sort_largest_first(&mut debtors);
        }
    }

    if let Some(open) = debtors.front().or_else(|| creditors.front()) {
        debug!(
            traveler_id = %open.traveler_id,
            remaining = %open.amount,
            "Discarding rounding residue"
        );
    }

    settlements
}

/// Stable, so equal amounts keep traveler-id order.
fn sort_largest_first(open: &mut VecDeque<OpenAmount>) {
    open.make_contiguous()
        .sort_by(|a, b| b.amount.cmp(&a.amount));
}

fn is_consumed(remaining: Money, tolerance: Money) -> bool {
    remaining < tolerance || !remaining.is_positive()
}

// =============================================================================
// Unit Tests
// =============================================================================
