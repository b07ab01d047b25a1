//! Balance and allowance book shared by every in-memory token.

use std::collections::HashMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances, allowances and total supply of one fungible token.
///
/// Used by [`StandardToken`](super::StandardToken), by
/// [`WrappedNativeToken`](super::WrappedNativeToken) and, through a
/// standard token registered at the pair's address, by LP shares.
///
/// # Invariant
///
/// `total_supply` equals the sum of all balances.  Only [`mint`](Self::mint)
/// and [`burn`](Self::burn) change the supply; transfers move units.
///
/// Zero balances and allowances are not stored, so two books holding the
/// same positions compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl ShareLedger {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total units in existence.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(Amount::ZERO)
    }

    /// Units `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Creates `amount` new units owned by `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the supply would exceed `u128`.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&amount)?;
        let balance = self.balance_of(&to).safe_add(&amount)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Destroys `amount` units owned by `from`.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `from` holds less than `amount`.
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("burn amount exceeds balance"))?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.total_supply = supply;
        self.set_balance(from, balance);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `from` holds less than `amount`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let debited = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("transfer amount exceeds balance"))?;
        self.set_balance(from, debited);
        // Cannot overflow: the supply bounds every balance.
        let credited = self.balance_of(&to).safe_add(&amount)?;
        self.set_balance(to, credited);
        Ok(())
    }

    /// Consumes `amount` of `spender`'s allowance over `owner`.  An
    /// unlimited ([`Amount::MAX`]) allowance is left untouched.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if the allowance is insufficient.
    pub fn spend_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let current = self.allowance(&owner, &spender);
        if current == Amount::MAX {
            return Ok(());
        }
        let remaining = current
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("insufficient allowance"))?;
        self.approve(owner, spender, remaining);
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner` to `amount`.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Overwrites the supply when the ledger rolls back a unit of work.
    pub(crate) fn set_total_supply(&mut self, total_supply: Amount) {
        self.total_supply = total_supply;
    }

    pub(crate) fn set_balance(&mut self, owner: Address, balance: Amount) {
        if balance.is_zero() {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, balance);
        }
    }
}
