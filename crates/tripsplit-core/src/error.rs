//! # Error Types
//!
//! Domain-specific error types for tripsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError            - strict conversions, snapshots, configuration    │
//! │  └── ValidationError  - boundary checks on a Tour before it is stored  │
//! │                                                                         │
//! │  Balance and settlement calculation NEVER return these: a missing      │
//! │  currency degrades to the unconverted amount and is logged instead.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the fallible edges of the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A currency code does not resolve to a Currency of the tour.
    ///
    /// ## When This Occurs
    /// - Currency was removed from the tour after expenses were logged in it
    /// - A snapshot was assembled from inconsistent storage reads
    #[error("Currency {code} is not configured on tour {tour_id}")]
    CurrencyNotFound { code: String, tour_id: String },

    /// A currency's exchange rate is zero or negative.
    #[error("Currency {code} has invalid exchange rate {rate}")]
    InvalidExchangeRate { code: String, rate: String },

    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A tour snapshot could not be decoded.
    #[error("Invalid tour snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Data-integrity problems found in a tour snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., currency code that is not 3 letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., two currencies with the same code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A record points at a traveler or currency the tour does not have.
    #[error("{field} references unknown {kind} '{value}'")]
    UnknownReference {
        field: String,
        kind: String,
        value: String,
    },

    /// The base currency is missing or its rate is not exactly 1.
    #[error("Base currency {code} must be listed with exchange rate 1")]
    BaseCurrencyRate { code: String },

    /// Split amounts do not add up to the expense amount.
    #[error("Splits of expense {expense_id} sum to {split_total}, expected {amount}")]
    SplitMismatch {
        expense_id: String,
        amount: String,
        split_total: String,
    },

    /// A payment from a traveler to themselves.
    #[error("Payment {payment_id} has the same sender and receiver")]
    SelfPayment { payment_id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
