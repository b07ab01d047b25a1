//! Swap fee tier built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::basis_points::BPS_DENOMINATOR;
use super::BasisPoints;

/// The trading fee charged on every swap input.
///
/// The fee never leaves the pool: it stays in the reserves and raises `k`,
/// which is how liquidity providers earn.  Pair invariant checks and the
/// router's quotes both scale by [`DENOMINATOR`](Self::DENOMINATOR) and
/// weigh inputs by [`input_multiplier`](Self::input_multiplier), so for the
/// default 30 bp tier the arithmetic is the classic `997 / 1000` form times
/// ten, and floors to the same integers.
///
/// # Examples
///
/// ```
/// use pairswap::domain::FeeTier;
///
/// let tier = FeeTier::default();
/// assert_eq!(tier.basis_points().get(), 30);
/// assert_eq!(tier.input_multiplier(), 9_970);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// Scale applied to balances in the invariant check.
    pub const DENOMINATOR: u128 = BPS_DENOMINATOR as u128;

    /// 0.05% fee, for tightly pegged pairs.
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% fee, the standard volatile-pair tier.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    #[must_use]
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Weight of one unit of input after the fee: `DENOMINATOR − fee_bps`.
    #[must_use]
    pub const fn input_multiplier(&self) -> u128 {
        self.0.complement().get() as u128
    }

    /// The fee in basis points as a `u128` factor.
    #[must_use]
    pub const fn fee_factor(&self) -> u128 {
        self.0.get() as u128
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
