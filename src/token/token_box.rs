//! Enum dispatch wrapper for the token kinds the ledger can hold.

use super::{ShareLedger, StandardToken, WrappedNativeToken};
use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::TokenAdapter;

/// Static-dispatch wrapper over every in-memory token implementation.
///
/// The [`Ledger`](crate::ledger::Ledger) stores tokens as `TokenBox` so it
/// can hold standard tokens, LP shares and the wrapped-native token in one
/// map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenBox {
    /// Plain token or LP shares.
    Standard(StandardToken),

    /// Wrapped native currency.
    WrappedNative(WrappedNativeToken),
}

/// Delegates a method call to the inner token of every variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            TokenBox::Standard(t) => t.$method($($arg),*),
            TokenBox::WrappedNative(t) => t.$method($($arg),*),
        }
    };
}

impl TokenBox {
    /// Returns the wrapped-native adapter, if this is one.
    pub fn as_wrapped_native_mut(&mut self) -> Option<&mut WrappedNativeToken> {
        match self {
            Self::WrappedNative(t) => Some(t),
            Self::Standard(_) => None,
        }
    }

    /// The balance book behind either variant, for the ledger's undo
    /// journal.
    pub(crate) fn book_mut(&mut self) -> &mut ShareLedger {
        delegate!(self, book_mut())
    }

    /// Returns `true` for the wrapped-native variant.
    #[must_use]
    pub const fn is_wrapped_native(&self) -> bool {
        matches!(self, Self::WrappedNative(_))
    }

    /// Mints `amount` to `to` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] if `caller` may not mint, or if this is
    ///   the wrapped-native token (which only mints on deposit).
    /// - [`AmmError::Overflow`] if the supply would overflow.
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        match self {
            Self::Standard(t) => t.mint(caller, to, amount),
            Self::WrappedNative(_) => Err(AmmError::Forbidden),
        }
    }

    /// Burns `amount` held by `from` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] as for [`mint`](Self::mint).
    /// - [`AmmError::TransferFailed`] if `from` holds less than `amount`.
    pub fn burn(&mut self, caller: Address, from: Address, amount: Amount) -> Result<(), AmmError> {
        match self {
            Self::Standard(t) => t.burn(caller, from, amount),
            Self::WrappedNative(_) => Err(AmmError::Forbidden),
        }
    }
}

impl TokenAdapter for TokenBox {
    fn address(&self) -> Address {
        delegate!(self, address())
    }

    fn total_supply(&self) -> Amount {
        delegate!(self, total_supply())
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        delegate!(self, balance_of(owner))
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        delegate!(self, allowance(owner, spender))
    }

    fn transfer(&mut self, owner: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        delegate!(self, transfer(owner, to, amount))
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        delegate!(self, transfer_from(spender, from, to, amount))
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<(), AmmError> {
        delegate!(self, approve(owner, spender, amount))
    }
}

impl From<StandardToken> for TokenBox {
    fn from(token: StandardToken) -> Self {
        Self::Standard(token)
    }
}

impl From<WrappedNativeToken> for TokenBox {
    fn from(token: WrappedNativeToken) -> Self {
        Self::WrappedNative(token)
    }
}
