//! # Engine Configuration
//!
//! Knobs for the two places where the settlement algorithm has a choice to
//! make. The defaults reproduce the behavior the web app has always shown.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TRIPSPLIT_MATCHING_STRATEGY=resort                                 │
//! │     TRIPSPLIT_UNKNOWN_TRAVELERS=ignore                                 │
//! │     TRIPSPLIT_TOLERANCE=0.01                                           │
//! │                                                                         │
//! │  2. Host-provided struct (deserialized from the host's own config)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     head_order, include, 0.01                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never touches the environment on its own: only
//! [`SettlementConfig::from_env`] does, and hosts call it explicitly.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, SETTLEMENT_TOLERANCE};

pub const ENV_MATCHING_STRATEGY: &str = "TRIPSPLIT_MATCHING_STRATEGY";
pub const ENV_UNKNOWN_TRAVELERS: &str = "TRIPSPLIT_UNKNOWN_TRAVELERS";
pub const ENV_TOLERANCE: &str = "TRIPSPLIT_TOLERANCE";

// =============================================================================
// Matching Strategy
// =============================================================================

/// How the settlement planner picks the next debtor/creditor pair.
///
/// ## Strategy Behavior
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  HEAD ORDER (Default)                                                  │
/// │  ────────────────────                                                  │
/// │  • Sort creditors and debtors once, largest first                      │
/// │  • Always match the current list heads                                 │
/// │  • A partially consumed head stays in front even when it has shrunk    │
/// │    below the next entry                                                │
/// │  • Same output as the existing web app                                 │
/// │                                                                         │
/// │  RESORT                                                                │
/// │  ──────                                                                │
/// │  • Re-sort both lists after every transfer                             │
/// │  • Always matches the two largest remaining amounts                    │
/// │  • Usually no more transfers than HEAD ORDER, sometimes other pairs    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStrategy {
    #[default]
    HeadOrder,
    Resort,
}

impl std::fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingStrategy::HeadOrder => write!(f, "head_order"),
            MatchingStrategy::Resort => write!(f, "resort"),
        }
    }
}

impl FromStr for MatchingStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "head_order" | "head-order" | "legacy" => Ok(MatchingStrategy::HeadOrder),
            "resort" | "re-sort" | "sorted" => Ok(MatchingStrategy::Resort),
            other => Err(CoreError::InvalidConfig(format!(
                "Unknown matching strategy: '{}'. Valid options: head_order, resort",
                other
            ))),
        }
    }
}

// =============================================================================
// Unknown Traveler Policy
// =============================================================================

/// What to do with a split or payment naming a traveler the tour no longer
/// lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTravelerPolicy {
    /// Keep the amount under an ad hoc balance entry for that id.
    #[default]
    Include,
    /// Drop the unknown traveler's side of the entry.
    Ignore,
}

impl std::fmt::Display for UnknownTravelerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownTravelerPolicy::Include => write!(f, "include"),
            UnknownTravelerPolicy::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for UnknownTravelerPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "include" | "phantom" => Ok(UnknownTravelerPolicy::Include),
            "ignore" | "skip" => Ok(UnknownTravelerPolicy::Ignore),
            other => Err(CoreError::InvalidConfig(format!(
                "Unknown traveler policy: '{}'. Valid options: include, ignore",
                other
            ))),
        }
    }
}

// =============================================================================
// Settlement Configuration
// =============================================================================

/// Options for balance calculation and settlement planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    #[serde(default)]
    pub strategy: MatchingStrategy,

    #[serde(default)]
    pub unknown_travelers: UnknownTravelerPolicy,

    /// Balances and transfers at or below this magnitude count as settled.
    /// Never negative.
    #[serde(
        default = "default_tolerance",
        deserialize_with = "deserialize_tolerance"
    )]
    pub tolerance: Money,
}

fn default_tolerance() -> Money {
    SETTLEMENT_TOLERANCE
}

fn deserialize_tolerance<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let tolerance = Money::deserialize(deserializer)?;
    if tolerance.is_negative() {
        return Err(serde::de::Error::custom(format!(
            "tolerance must not be negative, got {}",
            tolerance
        )));
    }
    Ok(tolerance)
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig {
            strategy: MatchingStrategy::default(),
            unknown_travelers: UnknownTravelerPolicy::default(),
            tolerance: default_tolerance(),
        }
    }
}

impl SettlementConfig {
    /// Builds a config from defaults plus whatever `lookup` returns for the
    /// `TRIPSPLIT_*` keys.
    ///
    /// ## Example
    /// ```rust
    /// use tripsplit_core::config::{MatchingStrategy, SettlementConfig};
    ///
    /// let config = SettlementConfig::from_lookup(|key| match key {
    ///     "TRIPSPLIT_MATCHING_STRATEGY" => Some("resort".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.strategy, MatchingStrategy::Resort);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SettlementConfig::default();

        if let Some(value) = lookup(ENV_MATCHING_STRATEGY) {
            config.strategy = value.parse()?;
        }

        if let Some(value) = lookup(ENV_UNKNOWN_TRAVELERS) {
            config.unknown_travelers = value.parse()?;
        }

        if let Some(value) = lookup(ENV_TOLERANCE) {
            let tolerance = Decimal::from_str(value.trim()).map_err(|e| {
                CoreError::InvalidConfig(format!("Invalid tolerance '{}': {}", value, e))
            })?;
            if tolerance.is_sign_negative() {
                return Err(CoreError::InvalidConfig(format!(
                    "Tolerance must not be negative, got {}",
                    tolerance
                )));
            }
            config.tolerance = Money::new(tolerance);
        }

        info!(
            strategy = %config.strategy,
            unknown_travelers = %config.unknown_travelers,
            tolerance = %config.tolerance,
            "Settlement configuration loaded"
        );

        Ok(config)
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.strategy, MatchingStrategy::HeadOrder);
        assert_eq!(config.unknown_travelers, UnknownTravelerPolicy::Include);
        assert_eq!(config.tolerance, SETTLEMENT_TOLERANCE);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "RESORT".parse::<MatchingStrategy>().unwrap(),
            MatchingStrategy::Resort
        );
        assert_eq!(
            "head-order".parse::<MatchingStrategy>().unwrap(),
            MatchingStrategy::HeadOrder
        );
        assert!("fastest".parse::<MatchingStrategy>().is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "ignore".parse::<UnknownTravelerPolicy>().unwrap(),
            UnknownTravelerPolicy::Ignore
        );
        assert!("reject".parse::<UnknownTravelerPolicy>().is_err());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = SettlementConfig::from_lookup(|key| match key {
            ENV_UNKNOWN_TRAVELERS => Some("ignore".to_string()),
            ENV_TOLERANCE => Some(" 0.05 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.strategy, MatchingStrategy::HeadOrder);
        assert_eq!(config.unknown_travelers, UnknownTravelerPolicy::Ignore);
        assert_eq!(config.tolerance, Money::new(dec!(0.05)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad_tolerance = SettlementConfig::from_lookup(|key| match key {
            ENV_TOLERANCE => Some("a cent".to_string()),
            _ => None,
        });
        assert!(matches!(bad_tolerance, Err(CoreError::InvalidConfig(_))));

        let negative = SettlementConfig::from_lookup(|key| match key {
            ENV_TOLERANCE => Some("-0.01".to_string()),
            _ => None,
        });
        assert!(negative.is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SettlementConfig = serde_json::from_str(r#"{ "strategy": "resort" }"#).unwrap();
        assert_eq!(config.strategy, MatchingStrategy::Resort);
        assert_eq!(config.tolerance, SETTLEMENT_TOLERANCE);
    }

    #[test]
    fn test_deserialize_rejects_negative_tolerance() {
        let negative = serde_json::from_str::<SettlementConfig>(r#"{ "tolerance": -0.5 }"#);
        assert!(negative.is_err());

        let zero: SettlementConfig = serde_json::from_str(r#"{ "tolerance": 0 }"#).unwrap();
        assert!(zero.tolerance.is_zero());
    }
}
