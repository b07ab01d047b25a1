//! Exchange-wide parameters shared by the factory and every pair.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BasisPoints, FeeTier};
use crate::error::AmmError;

/// Configuration for an exchange deployment.
///
/// Passed to [`Factory::new`](crate::factory::Factory::new) and copied into
/// every pair it creates; pairs never see a change after creation.
///
/// # Parameters
///
/// - `fee_tier`: trading fee charged on swap inputs (default 30 bp).
/// - `minimum_liquidity`: LP shares locked in the zero address on the
///   first deposit of every pair (default 1 000).
/// - `protocol_fee_divisor`: when a protocol fee recipient is set, it
///   receives `1 / (divisor + 1)` of the growth in `√k` (default 5, one
///   sixth).
///
/// Every field has a serde default, so a partial document overrides only
/// what it names.
///
/// # Examples
///
/// ```
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::Amount;
///
/// let cfg: ExchangeConfig = serde_json::from_str(r#"{"fee_tier": 5}"#).expect("valid json");
/// assert_eq!(cfg.fee_tier().basis_points().get(), 5);
/// assert_eq!(cfg.minimum_liquidity(), Amount::new(1_000));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default)]
    fee_tier: FeeTier,
    #[serde(default = "default_minimum_liquidity")]
    minimum_liquidity: Amount,
    #[serde(default = "default_protocol_fee_divisor")]
    protocol_fee_divisor: u32,
}

fn default_minimum_liquidity() -> Amount {
    Amount::new(1_000)
}

fn default_protocol_fee_divisor() -> u32 {
    5
}

impl ExchangeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn new(
        fee_tier: FeeTier,
        minimum_liquidity: Amount,
        protocol_fee_divisor: u32,
    ) -> Result<Self, AmmError> {
        let config = Self {
            fee_tier,
            minimum_liquidity,
            protocol_fee_divisor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] if the fee is 100% or more.
    /// - [`AmmError::InvalidConfiguration`] if the minimum liquidity or
    ///   the protocol fee divisor is zero.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.fee_tier.basis_points() >= BasisPoints::MAX_PERCENT {
            return Err(AmmError::InvalidFee("fee must be below 100%"));
        }
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum liquidity must be non-zero",
            ));
        }
        if self.protocol_fee_divisor == 0 {
            return Err(AmmError::InvalidConfiguration(
                "protocol fee divisor must be non-zero",
            ));
        }
        Ok(())
    }

    /// Returns the swap fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the shares locked on a pair's first deposit.
    pub const fn minimum_liquidity(&self) -> Amount {
        self.minimum_liquidity
    }

    /// Returns the protocol fee divisor.
    #[must_use]
    pub const fn protocol_fee_divisor(&self) -> u32 {
        self.protocol_fee_divisor
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_tier: FeeTier::default(),
            minimum_liquidity: default_minimum_liquidity(),
            protocol_fee_divisor: default_protocol_fee_divisor(),
        }
    }
}
