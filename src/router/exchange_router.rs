//! Router handle, pricing pass-throughs and shared helpers.

use std::sync::Arc;

use crate::domain::{Address, Amount, Path, Timestamp};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::ledger::Ledger;
use crate::math;

/// Stateless front end over a [`Factory`].
///
/// The router holds only immutable references: the factory, the address
/// of the wrapped-native token and its own address.  Callers approve the
/// router's address as spender before asking it to move their tokens or
/// LP shares.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::{Address, Amount};
/// use pairswap::factory::Factory;
/// use pairswap::router::Router;
///
/// let factory = Arc::new(Factory::new(Address::repeat_byte(0xAD), ExchangeConfig::default()).expect("factory"));
/// let router = Router::new(factory, Address::repeat_byte(0xEE), Address::repeat_byte(0x52)).expect("router");
///
/// let out = router
///     .get_amount_out(Amount::new(100), Amount::new(1_000), Amount::new(1_000))
///     .expect("priced");
/// assert_eq!(out, Amount::new(90));
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    pub(super) factory: Arc<Factory>,
    pub(super) weth: Address,
    pub(super) address: Address,
}

impl Router {
    /// Creates a router over `factory` that wraps native currency into
    /// `weth` and holds it transiently at `address`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] if `weth` or `address` is zero.
    /// - [`AmmError::IdenticalAddresses`] if they are the same.
    pub fn new(factory: Arc<Factory>, weth: Address, address: Address) -> Result<Self, AmmError> {
        if weth.is_zero() || address.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if weth == address {
            return Err(AmmError::IdenticalAddresses);
        }
        Ok(Self {
            factory,
            weth,
            address,
        })
    }

    /// The factory this router trades through.
    #[must_use]
    pub fn factory(&self) -> &Arc<Factory> {
        &self.factory
    }

    /// Address of the wrapped-native token.
    #[must_use]
    pub const fn weth(&self) -> Address {
        self.weth
    }

    /// The router's own address, used as spender and transient custodian.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    // ── pricing ───────────────────────────────────────────────────────

    /// See [`math::quote`].
    ///
    /// # Errors
    ///
    /// Same as [`math::quote`].
    pub fn quote(
        &self,
        amount_a: Amount,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Result<Amount, AmmError> {
        math::quote(amount_a, reserve_a, reserve_b)
    }

    /// [`math::get_amount_out`] at the factory's fee tier.
    ///
    /// # Errors
    ///
    /// Same as [`math::get_amount_out`].
    pub fn get_amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount, AmmError> {
        math::get_amount_out(amount_in, reserve_in, reserve_out, self.factory.config().fee_tier())
    }

    /// [`math::get_amount_in`] at the factory's fee tier.
    ///
    /// # Errors
    ///
    /// Same as [`math::get_amount_in`].
    pub fn get_amount_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount, AmmError> {
        math::get_amount_in(amount_out, reserve_in, reserve_out, self.factory.config().fee_tier())
    }

    /// Outputs along `path` for an exact input, using live reserves.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`] if a hop has no pair, otherwise as
    /// [`math::get_amounts_out`].
    pub fn get_amounts_out(&self, amount_in: Amount, path: &Path) -> Result<Vec<Amount>, AmmError> {
        math::get_amounts_out(amount_in, path, self.factory.config().fee_tier(), |a, b| {
            self.reserves(a, b)
        })
    }

    /// Inputs along `path` for an exact final output, using live reserves.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`] if a hop has no pair, otherwise as
    /// [`math::get_amounts_in`].
    pub fn get_amounts_in(&self, amount_out: Amount, path: &Path) -> Result<Vec<Amount>, AmmError> {
        math::get_amounts_in(amount_out, path, self.factory.config().fee_tier(), |a, b| {
            self.reserves(a, b)
        })
    }

    /// Reserves of the `(token_a, token_b)` pair, oriented to `token_a`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PairNotFound`] if no pair exists.
    pub fn reserves(&self, token_a: Address, token_b: Address) -> Result<(Amount, Amount), AmmError> {
        self.factory
            .pair_by_tokens(token_a, token_b)
            .ok_or(AmmError::PairNotFound)?
            .reserves_for(&token_a)
    }

    // ── shared helpers ────────────────────────────────────────────────

    pub(super) fn ensure(ledger: &Ledger, deadline: Timestamp) -> Result<(), AmmError> {
        if ledger.now() > deadline {
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    /// Takes `value` native units from `caller` and wraps `amount` of them
    /// at the router; returns the unwrapped remainder.
    pub(super) fn collect_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        value: Amount,
        amount: Amount,
    ) -> Result<Amount, AmmError> {
        let refund = value
            .checked_sub(&amount)
            .ok_or(AmmError::ExcessiveInputAmount)?;
        ledger.transfer_native(caller, self.address, value)?;
        ledger.wrap(self.weth, self.address, amount)?;
        Ok(refund)
    }

    /// Unwraps `amount` held by the router and pays it to `to`.
    pub(super) fn pay_native(
        &self,
        ledger: &mut Ledger,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ledger.unwrap(self.weth, self.address, amount)?;
        ledger.transfer_native(self.address, to, amount)
    }
}
