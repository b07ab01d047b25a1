//! Adding and removing liquidity.

use std::sync::Arc;

use super::unit_of_work::{execute, UnitOfWork};
use super::Router;
use crate::domain::{Address, Amount, Timestamp};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::math;
use crate::pair::Pair;

impl Router {
    /// Sizes a deposit against the current pool ratio, creating the pair
    /// if it does not exist yet.
    #[allow(clippy::too_many_arguments)]
    fn size_deposit(
        &self,
        work: &UnitOfWork<'_>,
        ledger: &mut Ledger,
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
    ) -> Result<(Arc<Pair>, Amount, Amount), AmmError> {
        let pair = work.pair_or_create(ledger, token_a, token_b)?;
        let (reserve_a, reserve_b) = pair.reserves_for(&token_a)?;
        if reserve_a.is_zero() && reserve_b.is_zero() {
            return Ok((pair, amount_a_desired, amount_b_desired));
        }
        let amount_b_optimal = math::quote(amount_a_desired, reserve_a, reserve_b)?;
        if amount_b_optimal <= amount_b_desired {
            if amount_b_optimal < amount_b_min {
                return Err(AmmError::InsufficientBAmount);
            }
            return Ok((pair, amount_a_desired, amount_b_optimal));
        }
        let amount_a_optimal = math::quote(amount_b_desired, reserve_b, reserve_a)?;
        if amount_a_optimal > amount_a_desired {
            return Err(AmmError::ExcessiveInputAmount);
        }
        if amount_a_optimal < amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        Ok((pair, amount_a_optimal, amount_b_desired))
    }

    /// Deposits up to the desired amounts of two tokens at the pool's
    /// current ratio and mints LP shares to `to`.
    ///
    /// The pair is created on first use; an empty pool takes both desired
    /// amounts verbatim.  Both tokens move from `caller` using the
    /// router's allowance.
    ///
    /// Returns `(amount_a, amount_b, liquidity)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the matched amount falls below its minimum.
    /// - Any pair, factory or token error.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount, Amount), AmmError> {
        execute(&self.factory, ledger, "add_liquidity", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            let (pair, amount_a, amount_b) = self.size_deposit(
                work,
                ledger,
                token_a,
                token_b,
                amount_a_desired,
                amount_b_desired,
                amount_a_min,
                amount_b_min,
            )?;
            ledger.transfer_from(token_a, self.address, caller, pair.address(), amount_a)?;
            ledger.transfer_from(token_b, self.address, caller, pair.address(), amount_b)?;
            let liquidity = pair.mint(ledger, self.address, to)?;
            Ok((amount_a, amount_b, liquidity))
        })
    }

    /// Like [`add_liquidity`](Self::add_liquidity) with native currency as
    /// the second leg.
    ///
    /// `value` native units are taken from `caller`; the matched amount is
    /// wrapped and deposited, the rest is refunded to `caller`.
    ///
    /// Returns `(amount_token, amount_eth, liquidity)`.
    ///
    /// # Errors
    ///
    /// As [`add_liquidity`](Self::add_liquidity), plus
    /// [`AmmError::TransferFailed`] if `caller` holds less than `value`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity_eth(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        amount_token_desired: Amount,
        amount_token_min: Amount,
        amount_eth_min: Amount,
        value: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount, Amount), AmmError> {
        execute(&self.factory, ledger, "add_liquidity_eth", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            let (pair, amount_token, amount_eth) = self.size_deposit(
                work,
                ledger,
                token,
                self.weth,
                amount_token_desired,
                value,
                amount_token_min,
                amount_eth_min,
            )?;
            ledger.transfer_from(token, self.address, caller, pair.address(), amount_token)?;
            let refund = self.collect_native(ledger, caller, value, amount_eth)?;
            ledger.transfer(self.weth, self.address, pair.address(), amount_eth)?;
            let liquidity = pair.mint(ledger, self.address, to)?;
            ledger.transfer_native(self.address, caller, refund)?;
            Ok((amount_token, amount_eth, liquidity))
        })
    }

    /// Burns `liquidity` LP shares and pays both tokens to `to`.
    #[allow(clippy::too_many_arguments)]
    fn withdraw(
        &self,
        work: &UnitOfWork<'_>,
        ledger: &mut Ledger,
        caller: Address,
        (token_a, token_b): (Address, Address),
        liquidity: Amount,
        (amount_a_min, amount_b_min): (Amount, Amount),
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let pair = work.pair(token_a, token_b)?;
        pair.transfer_from(ledger, self.address, caller, pair.address(), liquidity)?;
        let (amount0, amount1) = pair.burn(ledger, self.address, to)?;
        let (amount_a, amount_b) = pair.token_pair().orient(&token_a, amount0, amount1);
        if amount_a < amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }
        Ok((amount_a, amount_b))
    }

    /// Returns `liquidity` LP shares of `caller` to the pool and pays the
    /// pro-rata amounts of both tokens to `to`.
    ///
    /// `caller` must first approve the router to move its LP shares.
    ///
    /// Returns `(amount_a, amount_b)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::PairNotFound`] if the pair does not exist.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if a payout is below its minimum.
    /// - [`AmmError::TransferFailed`] if the LP allowance or balance is short.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token_a: Address,
        token_b: Address,
        liquidity: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount), AmmError> {
        execute(&self.factory, ledger, "remove_liquidity", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            self.withdraw(
                work,
                ledger,
                caller,
                (token_a, token_b),
                liquidity,
                (amount_a_min, amount_b_min),
                to,
            )
        })
    }

    /// Like [`remove_liquidity`](Self::remove_liquidity) for a
    /// token / wrapped-native pair: the token leg is forwarded to `to` and
    /// the wrapped leg is unwrapped and paid to `to` as native currency.
    ///
    /// Returns `(amount_token, amount_eth)`.
    ///
    /// # Errors
    ///
    /// As [`remove_liquidity`](Self::remove_liquidity).
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        liquidity: Amount,
        amount_token_min: Amount,
        amount_eth_min: Amount,
        to: Address,
        deadline: Timestamp,
    ) -> Result<(Amount, Amount), AmmError> {
        execute(&self.factory, ledger, "remove_liquidity_eth", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            let (amount_token, amount_eth) = self.withdraw(
                work,
                ledger,
                caller,
                (token, self.weth),
                liquidity,
                (amount_token_min, amount_eth_min),
                self.address,
            )?;
            ledger.transfer(token, self.address, to, amount_token)?;
            self.pay_native(ledger, to, amount_eth)?;
            Ok((amount_token, amount_eth))
        })
    }
}
