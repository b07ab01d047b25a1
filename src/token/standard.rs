//! Plain fungible token with a single minter.

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::TokenAdapter;

use super::ShareLedger;

/// An ERC-20 style token held entirely in memory.
///
/// Only the `minter` account may create units.  Units may be destroyed by
/// the minter or by their holder.  LP shares are a standard token whose
/// minter is the pair itself (see [`liquidity_shares`](Self::liquidity_shares)).
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, Amount};
/// use pairswap::token::StandardToken;
/// use pairswap::traits::TokenAdapter;
///
/// let owner = Address::repeat_byte(7);
/// let token = StandardToken::with_supply(
///     Address::repeat_byte(1),
///     "Token A",
///     "TKA",
///     owner,
///     Amount::new(1_000_000),
/// )
/// .expect("supply fits");
/// assert_eq!(token.balance_of(&owner), Amount::new(1_000_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardToken {
    address: Address,
    name: String,
    symbol: String,
    minter: Address,
    shares: ShareLedger,
}

impl StandardToken {
    /// Creates a token with no supply.
    #[must_use]
    pub fn new(address: Address, name: &str, symbol: &str, minter: Address) -> Self {
        Self {
            address,
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            minter,
            shares: ShareLedger::new(),
        }
    }

    /// Creates a token whose whole initial supply belongs to `holder`, who
    /// also becomes the minter.
    ///
    /// # Errors
    ///
    /// Never fails for a fresh book; the signature mirrors
    /// [`ShareLedger::mint`].
    pub fn with_supply(
        address: Address,
        name: &str,
        symbol: &str,
        holder: Address,
        supply: Amount,
    ) -> Result<Self, AmmError> {
        let mut token = Self::new(address, name, symbol, holder);
        token.shares.mint(holder, supply)?;
        Ok(token)
    }

    /// The LP-share token of the pair at `pair`.
    #[must_use]
    pub fn liquidity_shares(pair: Address) -> Self {
        Self::new(pair, "Pairswap LP", "PAIR-LP", pair)
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Account allowed to mint.
    #[must_use]
    pub const fn minter(&self) -> Address {
        self.minter
    }

    pub(crate) fn book_mut(&mut self) -> &mut ShareLedger {
        &mut self.shares
    }

    /// Mints `amount` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] unless `caller` is the minter.
    /// - [`AmmError::Overflow`] if the supply would overflow.
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        if caller != self.minter {
            return Err(AmmError::Forbidden);
        }
        self.shares.mint(to, amount)
    }

    /// Burns `amount` held by `from`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] unless `caller` is the minter or `from`.
    /// - [`AmmError::TransferFailed`] if `from` holds less than `amount`.
    pub fn burn(&mut self, caller: Address, from: Address, amount: Amount) -> Result<(), AmmError> {
        if caller != self.minter && caller != from {
            return Err(AmmError::Forbidden);
        }
        self.shares.burn(from, amount)
    }
}

impl TokenAdapter for StandardToken {
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
        // Check the balance first so a failed move does not eat allowance.
        if self.shares.balance_of(&from) < amount {
            return Err(AmmError::TransferFailed("transfer amount exceeds balance"));
        }
        self.shares.spend_allowance(from, spender, amount)?;
        self.shares.transfer(from, to, amount)
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<(), AmmError> {
        self.shares.approve(owner, spender, amount);
        Ok(())
    }
}
