//! The mutable world the exchange operates on.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{Address, Amount, Event, Timestamp, TokenPair};
use crate::error::AmmError;
use crate::factory::PairRegistry;
use crate::math::CheckedArithmetic;
use crate::pair::PairState;
use crate::token::{TokenBox, WrappedNativeToken};
use crate::traits::{TokenAdapter, WrappedNativeAdapter};

use super::journal::{Frame, Journal, Slot};

/// Tokens, native balances, the block clock and the event log.
///
/// Everything outside a pair's own reserves lives here and is passed to
/// every operation as `&mut Ledger`, so there is exactly one writer at a
/// time.
///
/// # Units of Work
///
/// [`atomic`](Self::atomic) runs a closure as one unit: if it returns an
/// error, every token balance, allowance, native balance, registered
/// token, clock change and event it produced is undone.  Pairs and
/// factories record their own writes here too, so reserves and pair
/// registrations roll back with the balances they depend on.  Units nest;
/// an inner unit that fails is undone on its own, and an outer unit that
/// fails also undoes inner units that succeeded.  Rollback work is
/// proportional to the entries the unit touched.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, Amount};
/// use pairswap::error::AmmError;
/// use pairswap::ledger::Ledger;
///
/// let alice = Address::repeat_byte(0xA1);
/// let mut ledger = Ledger::new();
/// ledger.credit_native(alice, Amount::new(100)).expect("no overflow");
///
/// let result: Result<(), AmmError> = ledger.atomic(|l| {
///     l.transfer_native(alice, Address::repeat_byte(0xB0), Amount::new(60))?;
///     Err(AmmError::Expired)
/// });
/// assert_eq!(result, Err(AmmError::Expired));
/// assert_eq!(ledger.native_balance(&alice), Amount::new(100));
/// ```
#[derive(Debug, Default)]
pub struct Ledger {
    tokens: HashMap<Address, TokenBox>,
    native: HashMap<Address, Amount>,
    now: Timestamp,
    events: Vec<Event>,
    journal: Journal,
}

impl Ledger {
    /// Creates an empty ledger at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── units of work ─────────────────────────────────────────────────

    /// Runs `f` as a unit of work, undoing all of its ledger effects if it
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn atomic<T, F>(&mut self, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Self) -> Result<T, AmmError>,
    {
        self.journal.begin(self.events.len(), self.now);
        match f(self) {
            Ok(value) => {
                self.journal.commit();
                Ok(value)
            }
            Err(err) => {
                if let Some(frame) = self.journal.rollback() {
                    self.restore(frame);
                }
                Err(err)
            }
        }
    }

    fn restore(&mut self, frame: Frame) {
        for (slot, saved) in frame.slots {
            let Some(token) = self.tokens.get_mut(&slot.token()) else {
                continue;
            };
            let book = token.book_mut();
            match slot {
                Slot::Supply(_) => book.set_total_supply(saved),
                Slot::Balance(_, owner) => book.set_balance(owner, saved),
                Slot::Allowance(_, owner, spender) => book.approve(owner, spender, saved),
            }
        }
        for address in frame.registered.iter().rev() {
            self.tokens.remove(address);
        }
        for (account, saved) in frame.native {
            self.set_native(account, saved);
        }
        for (_, saved) in frame.pairs {
            saved.restore();
        }
        for created in frame.created.iter().rev() {
            created.forget();
        }
        self.events.truncate(frame.events_len);
        self.now = frame.now;
    }

    /// Saves a pair's state before the pair overwrites it, so a failing
    /// enclosing unit puts it back.
    pub(crate) fn save_pair_state(&mut self, pair: Address, cell: &Arc<RwLock<PairState>>) {
        self.journal.record_pair(pair, cell);
    }

    /// Remembers that `tokens` was registered with `registry`, so a failing
    /// enclosing unit forgets the pair again.
    pub(crate) fn save_pair_created(&mut self, registry: PairRegistry, tokens: TokenPair) {
        self.journal.record_created(registry, tokens);
    }

    fn save(&mut self, slots: &[Slot]) -> Result<(), AmmError> {
        for slot in slots {
            let previous = match *slot {
                Slot::Supply(token) => self.total_supply(&token)?,
                Slot::Balance(token, owner) => self.balance_of(&token, &owner)?,
                Slot::Allowance(token, owner, spender) => {
                    self.allowance(&token, &owner, &spender)?
                }
            };
            self.journal.record_slot(*slot, previous);
        }
        Ok(())
    }

    // ── clock ─────────────────────────────────────────────────────────

    /// Current block time.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Sets the block time.
    pub fn set_timestamp(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Moves the block time forward by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.now = self.now.plus(seconds);
    }

    // ── events ────────────────────────────────────────────────────────

    /// Every event emitted by committed work, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Appends an event to the log.
    pub(crate) fn emit(&mut self, event: Event) {
        tracing::debug!(event = event.name(), "event emitted");
        self.events.push(event);
    }

    // ── tokens ────────────────────────────────────────────────────────

    /// Registers a token under its own address.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] if the token's address is zero.
    /// - [`AmmError::InvalidConfiguration`] if the address is taken.
    pub fn register_token(&mut self, token: impl Into<TokenBox>) -> Result<Address, AmmError> {
        let token = token.into();
        let address = token.address();
        if address.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if self.tokens.contains_key(&address) {
            return Err(AmmError::InvalidConfiguration("token already registered"));
        }
        self.journal.record_registered(address);
        self.tokens.insert(address, token);
        Ok(address)
    }

    /// The token registered at `address`.
    #[must_use]
    pub fn token(&self, address: &Address) -> Option<&TokenBox> {
        self.tokens.get(address)
    }

    /// Returns `true` if a token is registered at `address`.
    #[must_use]
    pub fn has_token(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    fn token_ref(&self, address: &Address) -> Result<&TokenBox, AmmError> {
        self.tokens.get(address).ok_or(AmmError::UnknownToken)
    }

    /// The token at `address` for writing.  Callers journal the slots
    /// they are about to change with [`save`](Self::save) first.
    fn token_mut(&mut self, address: &Address) -> Result<&mut TokenBox, AmmError> {
        self.tokens.get_mut(address).ok_or(AmmError::UnknownToken)
    }

    /// Balance of `owner` in `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if no token is registered at `token`.
    pub fn balance_of(&self, token: &Address, owner: &Address) -> Result<Amount, AmmError> {
        Ok(self.token_ref(token)?.balance_of(owner))
    }

    /// Total supply of `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if no token is registered at `token`.
    pub fn total_supply(&self, token: &Address) -> Result<Amount, AmmError> {
        Ok(self.token_ref(token)?.total_supply())
    }

    /// Allowance of `spender` over `owner` in `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if no token is registered at `token`.
    pub fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, AmmError> {
        Ok(self.token_ref(token)?.allowance(owner, spender))
    }

    /// Moves `amount` of `token` from `owner` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`], or the adapter's
    /// [`AmmError::TransferFailed`].
    pub fn transfer(
        &mut self,
        token: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.save(&[Slot::Balance(token, owner), Slot::Balance(token, to)])?;
        self.token_mut(&token)?.transfer(owner, to, amount)?;
        self.emit(Event::Transfer {
            token,
            from: owner,
            to,
            amount,
        });
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to` using `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`], or the adapter's
    /// [`AmmError::TransferFailed`].
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.save(&[
            Slot::Balance(token, from),
            Slot::Balance(token, to),
            Slot::Allowance(token, from, spender),
        ])?;
        self.token_mut(&token)?
            .transfer_from(spender, from, to, amount)?;
        self.emit(Event::Transfer {
            token,
            from,
            to,
            amount,
        });
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner` in `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    pub fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.save(&[Slot::Allowance(token, owner, spender)])?;
        self.token_mut(&token)?.approve(owner, spender, amount)?;
        self.emit(Event::Approval {
            token,
            owner,
            spender,
            amount,
        });
        Ok(())
    }

    /// Mints `amount` of `token` to `to`, authorised as `caller`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`], [`AmmError::Forbidden`] or
    /// [`AmmError::Overflow`].
    pub fn mint(
        &mut self,
        token: Address,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.save(&[Slot::Supply(token), Slot::Balance(token, to)])?;
        self.token_mut(&token)?.mint(caller, to, amount)?;
        self.emit(Event::Transfer {
            token,
            from: Address::ZERO,
            to,
            amount,
        });
        Ok(())
    }

    /// Burns `amount` of `token` held by `from`, authorised as `caller`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`], [`AmmError::Forbidden`] or
    /// [`AmmError::TransferFailed`].
    pub fn burn(
        &mut self,
        token: Address,
        caller: Address,
        from: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.save(&[Slot::Supply(token), Slot::Balance(token, from)])?;
        self.token_mut(&token)?.burn(caller, from, amount)?;
        self.emit(Event::Transfer {
            token,
            from,
            to: Address::ZERO,
            amount,
        });
        Ok(())
    }

    // ── native currency ───────────────────────────────────────────────

    /// Native-currency balance of `account`.
    pub fn native_balance(&self, account: &Address) -> Amount {
        self.native.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn set_native(&mut self, account: Address, balance: Amount) {
        if balance.is_zero() {
            self.native.remove(&account);
        } else {
            self.native.insert(account, balance);
        }
    }

    fn write_native(&mut self, account: Address, balance: Amount) {
        let previous = self.native_balance(&account);
        self.journal.record_native(account, previous);
        self.set_native(account, balance);
    }

    /// Creates native currency out of thin air for `account`.  Genesis
    /// allocations and test fixtures use this.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the balance would overflow.
    pub fn credit_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.native_balance(&account).safe_add(&amount)?;
        self.write_native(account, balance);
        Ok(())
    }

    /// Moves native currency between accounts.
    ///
    /// # Errors
    ///
    /// [`AmmError::TransferFailed`] if `from` holds less than `amount`.
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let debited = self
            .native_balance(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("insufficient native balance"))?;
        self.write_native(from, debited);
        let credited = self.native_balance(&to).safe_add(&amount)?;
        self.write_native(to, credited);
        Ok(())
    }

    /// Wraps `amount` of `account`'s native currency into `token`.
    ///
    /// The native units move to the token's address; `account` receives
    /// the same number of wrapped units.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`] if `token` is not registered.
    /// - [`AmmError::TransferFailed`] if `token` is not a wrapped-native
    ///   token or `account` holds too little native currency.
    pub fn wrap(&mut self, token: Address, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.atomic(|ledger| {
            ledger.transfer_native(account, token, amount)?;
            ledger.save(&[Slot::Supply(token), Slot::Balance(token, account)])?;
            ledger.wrapped_native_mut(&token)?.deposit(account, amount)?;
            ledger.emit(Event::Deposit {
                token,
                account,
                amount,
            });
            Ok(())
        })
    }

    /// Redeems `amount` wrapped units held by `account` for native
    /// currency paid to `account`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`] if `token` is not registered.
    /// - [`AmmError::TransferFailed`] if `token` is not a wrapped-native
    ///   token or `account` holds too few wrapped units.
    pub fn unwrap(
        &mut self,
        token: Address,
        account: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.atomic(|ledger| {
            ledger.save(&[Slot::Supply(token), Slot::Balance(token, account)])?;
            ledger.wrapped_native_mut(&token)?.withdraw(account, amount)?;
            ledger.transfer_native(token, account, amount)?;
            ledger.emit(Event::Withdrawal {
                token,
                account,
                amount,
            });
            Ok(())
        })
    }

    fn wrapped_native_mut(&mut self, token: &Address) -> Result<&mut WrappedNativeToken, AmmError> {
        self.token_mut(token)?
            .as_wrapped_native_mut()
            .ok_or(AmmError::TransferFailed("token does not wrap native currency"))
    }
}
