//! # Validation Module
//!
//! Boundary checks for tour data, run by the layer that accepts edits before
//! it stores them.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  ├── Required fields, number inputs                                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Currency invariants (base rate = 1, rates > 0)                    │
//! │  ├── Split sums match expense amounts                                  │
//! │  └── References resolve to travelers and currencies                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine: balance + settlement (tolerates whatever slipped through)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tripsplit_core::validation::{validate_currency_code, validate_tour};
//! use tripsplit_core::Tour;
//!
//! assert!(validate_currency_code("EUR").is_ok());
//! assert!(validate_currency_code("euro").is_err());
//! assert!(validate_tour(&Tour::new("t1", "Rome", "EUR")).is_ok());
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{Money, SETTLEMENT_TOLERANCE};
use crate::types::{Currency, Expense, PaymentRecord, Tour, Traveler};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a currency code.
///
/// ## Rules
/// - Exactly 3 characters
/// - Uppercase ASCII letters only
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currencyCode".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currencyCode".to_string(),
            reason: "must be 3 uppercase letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a currency record: code format and a positive rate.
pub fn validate_currency(currency: &Currency) -> ValidationResult<()> {
    validate_currency_code(&currency.code)?;

    if currency.exchange_rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: format!("exchangeRate of {}", currency.code),
        });
    }

    Ok(())
}

/// Validates a traveler record.
pub fn validate_traveler(traveler: &Traveler) -> ValidationResult<()> {
    if traveler.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "traveler id".to_string(),
        });
    }

    if traveler.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "traveler name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates an expense against the tour it belongs to.
///
/// ## Rules
/// - Amount is not negative
/// - Payer and every split traveler exist on the tour
/// - Currency is configured on the tour
/// - At least one split, no traveler twice
/// - Splits sum to the amount within one cent
pub fn validate_expense(expense: &Expense, tour: &Tour) -> ValidationResult<()> {
    if expense.amount.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: format!("amount of expense {}", expense.id),
        });
    }

    require_traveler(tour, "paidById", &expense.paid_by_id)?;
    require_currency(tour, &expense.currency_code)?;

    if expense.splits.is_empty() {
        return Err(ValidationError::Required {
            field: format!("splits of expense {}", expense.id),
        });
    }

    let mut seen = HashSet::new();
    for split in &expense.splits {
        require_traveler(tour, "splits.travelerId", &split.traveler_id)?;
        if !seen.insert(split.traveler_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: format!("split traveler of expense {}", expense.id),
                value: split.traveler_id.clone(),
            });
        }
    }

    let split_total: Money = expense.splits.iter().map(|s| s.amount).sum();
    if (split_total - expense.amount).abs() > SETTLEMENT_TOLERANCE {
        return Err(ValidationError::SplitMismatch {
            expense_id: expense.id.clone(),
            amount: expense.amount.to_string(),
            split_total: split_total.to_string(),
        });
    }

    Ok(())
}

/// Validates a payment record against the tour it belongs to.
pub fn validate_payment(payment: &PaymentRecord, tour: &Tour) -> ValidationResult<()> {
    if !payment.amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: format!("amount of payment {}", payment.id),
        });
    }

    if payment.from_traveler_id == payment.to_traveler_id {
        return Err(ValidationError::SelfPayment {
            payment_id: payment.id.clone(),
        });
    }

    require_traveler(tour, "fromTravelerId", &payment.from_traveler_id)?;
    require_traveler(tour, "toTravelerId", &payment.to_traveler_id)?;
    require_currency(tour, &payment.currency_code)?;

    Ok(())
}

// =============================================================================
// Tour Validator
// =============================================================================

/// Runs every check on a whole tour, stopping at the first failure.
///
/// ## Order
/// ```text
/// base currency ──► currencies ──► travelers ──► expenses ──► payments
/// ```
pub fn validate_tour(tour: &Tour) -> ValidationResult<()> {
    validate_currency_code(&tour.base_currency_code)?;

    match tour.currency(&tour.base_currency_code) {
        Some(base) if base.exchange_rate == Decimal::ONE => {}
        _ => {
            return Err(ValidationError::BaseCurrencyRate {
                code: tour.base_currency_code.clone(),
            })
        }
    }

    let mut codes = HashSet::new();
    for currency in &tour.currencies {
        validate_currency(currency)?;
        if !codes.insert(currency.code.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "currencyCode".to_string(),
                value: currency.code.clone(),
            });
        }
    }

    let mut ids = HashSet::new();
    for traveler in &tour.travelers {
        validate_traveler(traveler)?;
        if !ids.insert(traveler.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "traveler id".to_string(),
                value: traveler.id.clone(),
            });
        }
    }

    for expense in &tour.expenses {
        validate_expense(expense, tour)?;
    }

    for payment in &tour.payments {
        validate_payment(payment, tour)?;
    }

    Ok(())
}

fn require_traveler(tour: &Tour, field: &str, id: &str) -> ValidationResult<()> {
    if tour.has_traveler(id) {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference {
            field: field.to_string(),
            kind: "traveler".to_string(),
            value: id.to_string(),
        })
    }
}

fn require_currency(tour: &Tour, code: &str) -> ValidationResult<()> {
    if tour.currency(code).is_some() {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference {
            field: "currencyCode".to_string(),
            kind: "currency".to_string(),
            value: code.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpenseCategory, ExpenseSplit, PaymentMethod};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn tour() -> Tour {
        let mut tour = Tour::new("t1", "Oslo", "NOK");
        tour.currencies.push(Currency::new("EUR", "Euro", dec!(0.087)));
        tour.travelers = vec![Traveler::new("ida", "Ida"), Traveler::new("ola", "Ola")];
        tour
    }

    fn expense(splits: Vec<ExpenseSplit>) -> Expense {
        Expense {
            id: "e1".to_string(),
            description: "Ferry".to_string(),
            amount: Money::new(dec!(100)),
            currency_code: "NOK".to_string(),
            base_amount: None,
            date: date(),
            paid_by_id: "ida".to_string(),
            category: ExpenseCategory::Transport,
            splits,
        }
    }

    fn payment(from: &str, to: &str, amount: Money) -> PaymentRecord {
        PaymentRecord {
            id: "p1".to_string(),
            from_traveler_id: from.to_string(),
            to_traveler_id: to.to_string(),
            amount,
            currency_code: "EUR".to_string(),
            date: date(),
            method: PaymentMethod::Card,
            notes: None,
        }
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("usd").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("EURO").is_err());
    }

    #[test]
    fn test_validate_currency_rate() {
        assert!(validate_currency(&Currency::new("EUR", "Euro", dec!(0.9))).is_ok());
        assert!(validate_currency(&Currency::new("EUR", "Euro", dec!(0))).is_err());
        assert!(validate_currency(&Currency::new("EUR", "Euro", dec!(-1))).is_err());
    }

    #[test]
    fn test_validate_traveler() {
        assert!(validate_traveler(&Traveler::new("ida", "Ida")).is_ok());
        assert!(validate_traveler(&Traveler::new("ida", "  ")).is_err());
        assert!(validate_traveler(&Traveler::new("", "Ida")).is_err());
    }

    #[test]
    fn test_expense_split_sum() {
        let tour = tour();
        let ok = expense(vec![
            ExpenseSplit::new("ida", Money::new(dec!(50))),
            ExpenseSplit::new("ola", Money::new(dec!(49.99))),
        ]);
        assert!(validate_expense(&ok, &tour).is_ok());

        let off = expense(vec![
            ExpenseSplit::new("ida", Money::new(dec!(50))),
            ExpenseSplit::new("ola", Money::new(dec!(49))),
        ]);
        assert!(matches!(
            validate_expense(&off, &tour),
            Err(ValidationError::SplitMismatch { .. })
        ));
    }

    #[test]
    fn test_expense_references() {
        let tour = tour();
        let stranger = expense(vec![
            ExpenseSplit::new("ida", Money::new(dec!(50))),
            ExpenseSplit::new("zoe", Money::new(dec!(50))),
        ]);
        assert!(matches!(
            validate_expense(&stranger, &tour),
            Err(ValidationError::UnknownReference { .. })
        ));

        let twice = expense(vec![
            ExpenseSplit::new("ida", Money::new(dec!(50))),
            ExpenseSplit::new("ida", Money::new(dec!(50))),
        ]);
        assert!(matches!(
            validate_expense(&twice, &tour),
            Err(ValidationError::Duplicate { .. })
        ));

        assert!(validate_expense(&expense(vec![]), &tour).is_err());
    }

    #[test]
    fn test_validate_payment() {
        let tour = tour();
        assert!(validate_payment(&payment("ida", "ola", Money::from_cents(500)), &tour).is_ok());
        assert!(validate_payment(&payment("ida", "ola", Money::zero()), &tour).is_err());
        assert!(matches!(
            validate_payment(&payment("ida", "ida", Money::from_cents(500)), &tour),
            Err(ValidationError::SelfPayment { .. })
        ));
        assert!(validate_payment(&payment("ida", "zoe", Money::from_cents(500)), &tour).is_err());
    }

    #[test]
    fn test_validate_tour_base_currency() {
        let mut tour = tour();
        assert!(validate_tour(&tour).is_ok());

        tour.currencies[0].exchange_rate = dec!(1.1);
        assert_eq!(
            validate_tour(&tour),
            Err(ValidationError::BaseCurrencyRate {
                code: "NOK".to_string()
            })
        );

        tour.currencies.remove(0);
        assert!(validate_tour(&tour).is_err());
    }

    #[test]
    fn test_validate_tour_duplicates() {
        let mut tour = tour();
        tour.currencies.push(Currency::new("EUR", "Euro again", dec!(0.09)));
        assert!(matches!(
            validate_tour(&tour),
            Err(ValidationError::Duplicate { .. })
        ));
    }
}
