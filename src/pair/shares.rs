//! LP-share token surface of a pair.
//!
//! Shares are an ordinary token registered in the ledger at the pair's
//! address, so these are thin wrappers that fix the token argument.

use super::Pair;
use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::ledger::Ledger;

impl Pair {
    /// LP shares held by `owner`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if the share token was never registered.
    pub fn balance_of(&self, ledger: &Ledger, owner: &Address) -> Result<Amount, AmmError> {
        ledger.balance_of(&self.address(), owner)
    }

    /// Total LP shares, including the locked minimum.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if the share token was never registered.
    pub fn total_supply(&self, ledger: &Ledger) -> Result<Amount, AmmError> {
        ledger.total_supply(&self.address())
    }

    /// LP shares `spender` may move out of `owner`'s balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if the share token was never registered.
    pub fn allowance(
        &self,
        ledger: &Ledger,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, AmmError> {
        ledger.allowance(&self.address(), owner, spender)
    }

    /// Lets `spender` move up to `amount` of `owner`'s shares.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if the share token was never registered.
    pub fn approve(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ledger.approve(self.address(), owner, spender, amount)
    }

    /// Moves `amount` shares from `owner` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `owner` holds too few shares.
    pub fn transfer(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ledger.transfer(self.address(), owner, to, amount)
    }

    /// Moves `amount` shares from `from` to `to` using `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if the allowance or balance is short.
    pub fn transfer_from(
        &self,
        ledger: &mut Ledger,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ledger.transfer_from(self.address(), spender, from, to, amount)
    }
}
