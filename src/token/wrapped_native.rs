//! Wrapped native currency (WETH-style).

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::{TokenAdapter, WrappedNativeAdapter};

use super::ShareLedger;

/// A token minted 1:1 against native currency and burned on redemption.
///
/// The token only tracks the wrapped side.  The native units backing it
/// are held by the ledger under the token's own address, moved there by
/// [`Ledger::wrap`](crate::ledger::Ledger::wrap) and released by
/// [`Ledger::unwrap`](crate::ledger::Ledger::unwrap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedNativeToken {
    address: Address,
    shares: ShareLedger,
}

impl WrappedNativeToken {
    /// Creates an empty wrapped-native token at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            shares: ShareLedger::new(),
        }
    }

    pub(crate) fn book_mut(&mut self) -> &mut ShareLedger {
        &mut self.shares
    }
}

impl TokenAdapter for WrappedNativeToken {
    fn address(&self) -> Address {
        self.address
    }

    fn total_supply(&self) -> Amount {
        self.shares.total_supply()
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.shares.balance_of(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.shares.allowance(owner, spender)
    }

    fn transfer(&mut self, owner: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.shares.transfer(owner, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if self.shares.balance_of(&from) < amount {
            return Err(AmmError::TransferFailed("transfer amount exceeds balance"));
        }
        // WETH lets the holder move its own units without an allowance.
        if spender != from {
            self.shares.spend_allowance(from, spender, amount)?;
        }
        self.shares.transfer(from, to, amount)
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<(), AmmError> {
        self.shares.approve(owner, spender, amount);
        Ok(())
    }
}

impl WrappedNativeAdapter for WrappedNativeToken {
    fn deposit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.shares.mint(account, amount)
    }

    fn withdraw(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.shares.burn(account, amount)
    }
}
