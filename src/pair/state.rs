//! Reserves and price accumulators of one pair.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::domain::{Amount, Timestamp};
use crate::error::AmmError;
use crate::math::{accumulate_price, uq112x112_ratio, wide};

/// Snapshot of a pair's bookkeeping.
///
/// # State
///
/// - `reserve0` / `reserve1`: balances as of the last update, each at most
///   [`Amount::MAX_RESERVE`].
/// - `block_timestamp_last`: ledger time of the last update.
/// - `price0_cumulative_last` / `price1_cumulative_last`: time-weighted
///   sums of the UQ112x112 price of each token in the other, modulo `2^256`.
/// - `k_last`: `reserve0 × reserve1` after the last liquidity event, kept
///   only while the protocol fee is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairState {
    reserve0: Amount,
    reserve1: Amount,
    block_timestamp_last: Timestamp,
    price0_cumulative_last: BigUint,
    price1_cumulative_last: BigUint,
    k_last: BigUint,
}

impl PairState {
    /// Reserve of token0.
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// Reserve of token1.
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Ledger time of the last reserve update.
    #[must_use]
    pub const fn block_timestamp_last(&self) -> Timestamp {
        self.block_timestamp_last
    }

    /// Accumulated price of token0 in token1.
    #[must_use]
    pub fn price0_cumulative_last(&self) -> &BigUint {
        &self.price0_cumulative_last
    }

    /// Accumulated price of token1 in token0.
    #[must_use]
    pub fn price1_cumulative_last(&self) -> &BigUint {
        &self.price1_cumulative_last
    }

    /// Product of reserves after the last liquidity event.
    #[must_use]
    pub fn k_last(&self) -> &BigUint {
        &self.k_last
    }

    /// Current `reserve0 × reserve1`.
    #[must_use]
    pub fn k(&self) -> BigUint {
        wide(self.reserve0) * wide(self.reserve1)
    }

    /// Accrues the accumulators for the time since the last update, then
    /// stores the new balances as reserves.
    ///
    /// Accumulators only advance when time has passed and both old
    /// reserves are non-zero.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if either balance exceeds
    /// [`Amount::MAX_RESERVE`]; the state is left unchanged.
    pub(crate) fn update(
        &mut self,
        balance0: Amount,
        balance1: Amount,
        now: Timestamp,
    ) -> Result<(), AmmError> {
        if balance0 > Amount::MAX_RESERVE || balance1 > Amount::MAX_RESERVE {
            return Err(AmmError::Overflow("reserve exceeds 112 bits"));
        }
        let elapsed = now.seconds_since(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            let price0 = uq112x112_ratio(self.reserve1, self.reserve0)?;
            let price1 = uq112x112_ratio(self.reserve0, self.reserve1)?;
            self.price0_cumulative_last =
                accumulate_price(&self.price0_cumulative_last, &price0, elapsed);
            self.price1_cumulative_last =
                accumulate_price(&self.price1_cumulative_last, &price1, elapsed);
        }
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.block_timestamp_last = now;
        Ok(())
    }

    pub(crate) fn set_k_last(&mut self, k_last: BigUint) {
        self.k_last = k_last;
    }

    pub(crate) fn clear_k_last(&mut self) {
        self.k_last = BigUint::zero();
    }
}
