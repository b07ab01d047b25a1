//! Fungible-token abstractions the exchange moves value through.
//!
//! The pair and the router never touch balances directly: every movement
//! goes through a [`TokenAdapter`] held by the
//! [`Ledger`](crate::ledger::Ledger).  The wrapped-native token adds
//! [`WrappedNativeAdapter`] on top so the router can convert between the
//! ledger's native currency and a transferable token at path boundaries.
//!
//! # Caller Model
//!
//! There is no implicit message sender: every mutating method names the
//! acting account explicitly (`owner` for a direct transfer, `spender`
//! for a delegated one).  The ledger is responsible for emitting the
//! matching `Transfer` / `Approval` events after a call succeeds.

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// A fungible token with ERC-20 style balances and allowances.
///
/// # Errors
///
/// Mutating methods fail with [`AmmError::TransferFailed`] when a balance
/// or an allowance is insufficient, and leave the token unchanged.
pub trait TokenAdapter {
    /// Address the token is registered under.
    fn address(&self) -> Address;

    /// Total units in existence.
    fn total_supply(&self) -> Amount;

    /// Balance held by `owner`.
    fn balance_of(&self, owner: &Address) -> Amount;

    /// Units `spender` may move out of `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Moves `amount` from `owner` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `owner` holds less than `amount`.
    fn transfer(&mut self, owner: Address, to: Address, amount: Amount) -> Result<(), AmmError>;

    /// Moves `amount` from `from` to `to` on behalf of `spender`,
    /// consuming allowance.  An allowance of [`Amount::MAX`] is never
    /// decremented.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if the allowance or the balance is
    /// insufficient.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Sets `spender`'s allowance over `owner`'s balance to `amount`.
    ///
    /// # Errors
    ///
    /// Implementations may refuse approvals; the in-memory tokens never do.
    fn approve(&mut self, owner: Address, spender: Address, amount: Amount)
        -> Result<(), AmmError>;
}

/// A token backed 1:1 by the ledger's native currency.
///
/// Implementations only account for the wrapped side; the
/// [`Ledger`](crate::ledger::Ledger) moves the native currency in the
/// same unit of work.
pub trait WrappedNativeAdapter: TokenAdapter {
    /// Credits `account` with `amount` newly wrapped units.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the supply would overflow.
    fn deposit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError>;

    /// Burns `amount` wrapped units from `account`.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `account` holds less than `amount`.
    fn withdraw(&mut self, account: Address, amount: Amount) -> Result<(), AmmError>;
}
