//! Shipping and totals calculation.
//!
//! Every place that shows or submits money goes through [`PricingEngine`]
//! so the numbers a customer sees in the cart summary are the numbers
//! that end up on the bill.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::money::Money;

/// Errors that can occur when loading pricing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: String, reason: String },
}

/// Pricing thresholds, overridable through the environment.
///
/// # Environment Variables
///
/// - `FREE_SHIPPING_THRESHOLD` - subtotal above which shipping is free
///   (major units, default 500)
/// - `FLAT_SHIPPING_FEE` - fee charged at or below the threshold
///   (major units, default 25)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Subtotal strictly above this ships free.
    pub free_shipping_threshold: Money,

    /// Flat fee charged when the order does not qualify for free shipping.
    pub flat_shipping_fee: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::from_dollars(500),
            flat_shipping_fee: Money::from_dollars(25),
        }
    }
}

impl PricingConfig {
    /// Loads the configuration from the environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            free_shipping_threshold: env_money(
                "FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            flat_shipping_fee: env_money("FLAT_SHIPPING_FEE", defaults.flat_shipping_fee)?,
        })
    }
}

/// Reads a money amount in major units from an environment variable.
fn env_money(name: &str, default: Money) -> Result<Money, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidEnvVar {
                    name: name.to_string(),
                    reason: format!("must be a non-negative amount, got {}", raw),
                });
            }
            Ok(Money::from_major_units(value))
        }
        Err(_) => Ok(default),
    }
}

/// The three figures a checkout works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of unit price times quantity over all cart lines.
    pub subtotal: Money,

    /// Shipping cost for this subtotal.
    pub shipping: Money,

    /// Final amount billed: subtotal plus shipping.
    pub total: Money,
}

/// Computes shipping and totals from a subtotal.
///
/// Pure and deterministic: the same subtotal always produces the same
/// totals for a given configuration.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Returns the shipping cost for a subtotal.
    ///
    /// Shipping is free only when the subtotal is strictly greater than
    /// the threshold; a subtotal exactly at the threshold still pays the
    /// flat fee.
    pub fn shipping_cost(&self, subtotal: Money) -> Money {
        if subtotal > self.config.free_shipping_threshold {
            Money::zero()
        } else {
            self.config.flat_shipping_fee
        }
    }

    /// Computes subtotal, shipping and final total.
    pub fn totals(&self, subtotal: Money) -> CartTotals {
        let shipping = self.shipping_cost(subtotal);
        CartTotals {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// Computes totals for the current contents of a cart.
    pub fn totals_for(&self, cart: &Cart) -> CartTotals {
        self.totals(cart.subtotal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fee_below_threshold() {
        let engine = PricingEngine::default();
        let totals = engine.totals(Money::from_dollars(250));
        assert_eq!(totals.shipping, Money::from_dollars(25));
        assert_eq!(totals.total, Money::from_dollars(275));
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let engine = PricingEngine::default();
        let totals = engine.totals(Money::from_dollars(600));
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.total, Money::from_dollars(600));
    }

    #[test]
    fn test_threshold_boundary_still_pays_fee() {
        let engine = PricingEngine::default();

        // Exactly 500.00 is not strictly greater than the threshold.
        let at = engine.totals(Money::from_dollars(500));
        assert_eq!(at.shipping, Money::from_dollars(25));
        assert_eq!(at.total, Money::from_cents(52500));

        // One cent above qualifies.
        let above = engine.totals(Money::from_cents(50001));
        assert_eq!(above.shipping, Money::zero());
        assert_eq!(above.total, Money::from_cents(50001));
    }

    #[test]
    fn test_totals_are_deterministic() {
        let engine = PricingEngine::default();
        let subtotal = Money::from_cents(31750);
        assert_eq!(engine.totals(subtotal), engine.totals(subtotal));
    }

    #[test]
    fn test_custom_config() {
        let engine = PricingEngine::new(PricingConfig {
            free_shipping_threshold: Money::from_dollars(100),
            flat_shipping_fee: Money::from_dollars(10),
        });
        assert_eq!(
            engine.shipping_cost(Money::from_dollars(150)),
            Money::zero()
        );
        assert_eq!(
            engine.shipping_cost(Money::from_dollars(100)),
            Money::from_dollars(10)
        );
    }

    #[test]
    fn test_default_config_values() {
        let config = PricingConfig::default();
        assert_eq!(config.free_shipping_threshold, Money::from_dollars(500));
        assert_eq!(config.flat_shipping_fee, Money::from_dollars(25));
    }
}
