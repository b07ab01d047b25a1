//! Constant-product pair (`x · y = k`).
//!
//! A pair never prices anything itself.  Callers first move tokens to the
//! pair's address, then call [`Pair::mint`], [`Pair::swap`] or (after
//! sending LP shares) [`Pair::burn`]; the pair reads its own balances from
//! the ledger, works out what arrived, checks its invariant and updates
//! its reserves.
//!
//! # Swap Check (token amounts `b`, reserves `r`, inputs `in`, fee `f` bp)
//!
//! ```text
//! (b0·10 000 − in0·f) · (b1·10 000 − in1·f) ≥ r0 · r1 · 10 000²
//! ```
//!
//! The fee part of every input is left out of the product, so the swap
//! must at least preserve `k` net of fees and `k` itself grows by the fee.
//!
//! # Atomicity
//!
//! Every mutating operation runs inside [`Ledger::atomic`] on a copy of
//! the pair's state; the copy is written back only when the operation
//! succeeds, and the state it replaces is saved in the ledger's journal.
//! An enclosing unit that fails later (an outer flash swap, a router
//! call) therefore restores the reserves together with the balances.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{CheckedSub, Zero};
use parking_lot::{Mutex, MutexGuard, RwLock};

use super::PairState;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, Event, FeeTier, Timestamp, TokenPair};
use crate::error::AmmError;
use crate::factory::FeeSettings;
use crate::ledger::Ledger;
use crate::math::{mul_div, narrow, sqrt_product, wide, CheckedArithmetic, Rounding};
use crate::traits::FlashSwapCallee;

/// Callback half of a flash swap: who to call and what to pass along.
pub struct FlashSwap<'a> {
    callee: &'a mut dyn FlashSwapCallee,
    data: &'a [u8],
}

impl<'a> FlashSwap<'a> {
    /// Pairs a callee with the opaque data it receives.
    pub fn new(callee: &'a mut dyn FlashSwapCallee, data: &'a [u8]) -> Self {
        Self { callee, data }
    }
}

impl core::fmt::Debug for FlashSwap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlashSwap")
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// One liquidity pool for an unordered token pair.
///
/// Pairs are created by the [`Factory`](crate::factory::Factory) and
/// shared as `Arc<Pair>`.  The pair's address doubles as the address of
/// its LP-share token in the [`Ledger`].
///
/// # Locking
///
/// Mutating operations hold a per-pair lock for their whole duration,
/// including a flash-swap callback.  A second mutating call on the same
/// pair while the lock is held fails with [`AmmError::Locked`].  Views
/// never take that lock; during a callback they report the reserves from
/// before the swap.
#[derive(Debug)]
pub struct Pair {
    address: Address,
    tokens: TokenPair,
    config: ExchangeConfig,
    fee_settings: Arc<RwLock<FeeSettings>>,
    lock: Mutex<()>,
    state: Arc<RwLock<PairState>>,
}

impl Pair {
    pub(crate) fn new(
        address: Address,
        tokens: TokenPair,
        config: ExchangeConfig,
        fee_settings: Arc<RwLock<FeeSettings>>,
    ) -> Self {
        Self {
            address,
            tokens,
            config,
            fee_settings,
            lock: Mutex::new(()),
            state: Arc::new(RwLock::new(PairState::default())),
        }
    }

    // ── views ─────────────────────────────────────────────────────────

    /// Address of the pair and of its LP-share token.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The sorted token pair.
    #[must_use]
    pub const fn token_pair(&self) -> TokenPair {
        self.tokens
    }

    /// The lower token address.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.tokens.token0()
    }

    /// The higher token address.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.tokens.token1()
    }

    /// Swap fee charged by this pair.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.config.fee_tier()
    }

    /// `(reserve0, reserve1, block_timestamp_last)`.
    #[must_use]
    pub fn reserves(&self) -> (Amount, Amount, Timestamp) {
        let state = self.state.read();
        (state.reserve0(), state.reserve1(), state.block_timestamp_last())
    }

    /// Reserves oriented as `(reserve_of(token), reserve_of(other))`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidPath`] if `token` is not part of the pair.
    pub fn reserves_for(&self, token: &Address) -> Result<(Amount, Amount), AmmError> {
        if !self.tokens.contains(token) {
            return Err(AmmError::InvalidPath);
        }
        let (reserve0, reserve1, _) = self.reserves();
        Ok(self.tokens.orient(token, reserve0, reserve1))
    }

    /// Accumulated price of token0 in token1 (UQ112x112 × seconds).
    #[must_use]
    pub fn price0_cumulative_last(&self) -> BigUint {
        self.state.read().price0_cumulative_last().clone()
    }

    /// Accumulated price of token1 in token0 (UQ112x112 × seconds).
    #[must_use]
    pub fn price1_cumulative_last(&self) -> BigUint {
        self.state.read().price1_cumulative_last().clone()
    }

    /// `reserve0 × reserve1` after the last liquidity event while the
    /// protocol fee is on, zero otherwise.
    #[must_use]
    pub fn k_last(&self) -> BigUint {
        self.state.read().k_last().clone()
    }

    /// A copy of the whole bookkeeping state.
    #[must_use]
    pub fn state(&self) -> PairState {
        self.state.read().clone()
    }

    // ── mutating operations ───────────────────────────────────────────

    fn enter(&self) -> Result<MutexGuard<'_, ()>, AmmError> {
        self.lock.try_lock().ok_or(AmmError::Locked)
    }

    /// Runs `op` under the pair lock on a copy of the state, inside a
    /// ledger unit of work.
    fn run<T, F>(&self, ledger: &mut Ledger, op: F) -> Result<T, AmmError>
    where
        F: FnOnce(&Self, &mut Ledger, &mut PairState) -> Result<T, AmmError>,
    {
        let _guard = self.enter()?;
        ledger.atomic(|ledger| {
            let mut state = self.state.read().clone();
            let value = op(self, ledger, &mut state)?;
            ledger.save_pair_state(self.address, &self.state);
            *self.state.write() = state;
            Ok(value)
        })
    }

    /// Mints LP shares to `to` for the tokens sent to the pair since the
    /// last update.
    ///
    /// The first deposit mints `√(amount0 × amount1) − minimum_liquidity`
    /// and locks `minimum_liquidity` at the zero address forever.  Later
    /// deposits mint the smaller of the two pro-rata share counts, so an
    /// unbalanced deposit donates its excess to existing holders.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if the pair is already mid-operation.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be
    ///   minted.
    /// - [`AmmError::Overflow`] if a reserve would exceed 112 bits.
    pub fn mint(&self, ledger: &mut Ledger, sender: Address, to: Address) -> Result<Amount, AmmError> {
        self.run(ledger, |pair, ledger, state| pair.mint_locked(ledger, state, sender, to))
    }

    fn mint_locked(
        &self,
        ledger: &mut Ledger,
        state: &mut PairState,
        sender: Address,
        to: Address,
    ) -> Result<Amount, AmmError> {
        let (balance0, balance1) = self.balances(ledger)?;
        let amount0 = balance0.safe_sub(&state.reserve0())?;
        let amount1 = balance1.safe_sub(&state.reserve1())?;

        let fee_on = self.mint_fee(ledger, state)?;
        let total_supply = ledger.total_supply(&self.address)?;
        let minimum = self.config.minimum_liquidity();

        let liquidity = if total_supply.is_zero() {
            let liquidity = sqrt_product(amount0, amount1)
                .checked_sub(&minimum)
                .ok_or(AmmError::InsufficientLiquidityMinted)?;
            ledger.mint(self.address, self.address, Address::ZERO, minimum)?;
            liquidity
        } else {
            let by0 = mul_div(amount0, total_supply, state.reserve0(), Rounding::Down)?;
            let by1 = mul_div(amount1, total_supply, state.reserve1(), Rounding::Down)?;
            by0.min(by1)
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        ledger.mint(self.address, self.address, to, liquidity)?;

        self.commit_reserves(ledger, state, balance0, balance1)?;
        if fee_on {
            state.set_k_last(state.k());
        }
        ledger.emit(Event::Mint {
            pair: self.address,
            sender,
            amount0,
            amount1,
        });
        tracing::info!(
            "Minted {} LP shares on pair {} for {} / {}",
            liquidity,
            self.address,
            amount0,
            amount1
        );
        Ok(liquidity)
    }

    /// Burns the LP shares held by the pair itself and pays the matching
    /// share of both balances to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if the pair is already mid-operation.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout would
    ///   be zero.
    pub fn burn(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        self.run(ledger, |pair, ledger, state| pair.burn_locked(ledger, state, sender, to))
    }

    fn burn_locked(
        &self,
        ledger: &mut Ledger,
        state: &mut PairState,
        sender: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let (balance0, balance1) = self.balances(ledger)?;
        let liquidity = ledger.balance_of(&self.address, &self.address)?;

        let fee_on = self.mint_fee(ledger, state)?;
        let total_supply = ledger.total_supply(&self.address)?;
        if total_supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let amount0 = mul_div(liquidity, balance0, total_supply, Rounding::Down)?;
        let amount1 = mul_div(liquidity, balance1, total_supply, Rounding::Down)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        ledger.burn(self.address, self.address, self.address, liquidity)?;
        ledger.transfer(self.token0(), self.address, to, amount0)?;
        ledger.transfer(self.token1(), self.address, to, amount1)?;

        let (balance0, balance1) = self.balances(ledger)?;
        self.commit_reserves(ledger, state, balance0, balance1)?;
        if fee_on {
            state.set_k_last(state.k());
        }
        ledger.emit(Event::Burn {
            pair: self.address,
            sender,
            amount0,
            amount1,
            to,
        });
        tracing::info!(
            "Burned {} LP shares on pair {} for {} / {}",
            liquidity,
            self.address,
            amount0,
            amount1
        );
        Ok((amount0, amount1))
    }

    /// Sends the requested outputs to `to`, optionally calls back a flash
    /// swap receiver, then verifies the fee-adjusted invariant against
    /// whatever input arrived.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if the pair is already mid-operation.
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientLiquidity`] if an output reaches its reserve.
    /// - [`AmmError::InvalidTo`] if `to` is one of the pair's tokens.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::K`] if the invariant would decrease.
    /// - Any error from the flash-swap callee.
    pub fn swap(
        &self,
        ledger: &mut Ledger,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        flash: Option<FlashSwap<'_>>,
    ) -> Result<(), AmmError> {
        self.run(ledger, |pair, ledger, state| {
            pair.swap_locked(ledger, state, sender, (amount0_out, amount1_out), to, flash)
        })
    }

    fn swap_locked(
        &self,
        ledger: &mut Ledger,
        state: &mut PairState,
        sender: Address,
        (amount0_out, amount1_out): (Amount, Amount),
        to: Address,
        flash: Option<FlashSwap<'_>>,
    ) -> Result<(), AmmError> {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let (reserve0, reserve1) = (state.reserve0(), state.reserve1());
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(AmmError::InsufficientLiquidity);
        }
        if self.tokens.contains(&to) {
            return Err(AmmError::InvalidTo);
        }

        if !amount0_out.is_zero() {
            ledger.transfer(self.token0(), self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            ledger.transfer(self.token1(), self.address, to, amount1_out)?;
        }
        if let Some(flash) = flash {
            tracing::debug!("Flash swap callback from pair {}", self.address);
            flash
                .callee
                .on_flash_swap(ledger, sender, amount0_out, amount1_out, flash.data)?;
        }

        let (balance0, balance1) = self.balances(ledger)?;
        // outputs are below reserves, so these cannot underflow
        let amount0_in = balance0.saturating_sub(&reserve0.saturating_sub(&amount0_out));
        let amount1_in = balance1.saturating_sub(&reserve1.saturating_sub(&amount1_out));
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        let scale = BigUint::from(FeeTier::DENOMINATOR);
        let fee = BigUint::from(self.fee_tier().fee_factor());
        let adjusted0 = (wide(balance0) * &scale)
            .checked_sub(&(wide(amount0_in) * &fee))
            .ok_or(AmmError::Underflow("fee exceeds balance"))?;
        let adjusted1 = (wide(balance1) * &scale)
            .checked_sub(&(wide(amount1_in) * &fee))
            .ok_or(AmmError::Underflow("fee exceeds balance"))?;
        if adjusted0 * adjusted1 < state.k() * &scale * &scale {
            return Err(AmmError::K);
        }

        self.commit_reserves(ledger, state, balance0, balance1)?;
        ledger.emit(Event::Swap {
            pair: self.address,
            sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        tracing::debug!(
            "Swap on pair {}: in {} / {}, out {} / {}",
            self.address,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out
        );
        Ok(())
    }

    /// Sends any balance above the reserves to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::Locked`] if the pair is already mid-operation.
    pub fn skim(&self, ledger: &mut Ledger, to: Address) -> Result<(), AmmError> {
        self.run(ledger, |pair, ledger, state| {
            let (balance0, balance1) = pair.balances(ledger)?;
            let excess0 = balance0.saturating_sub(&state.reserve0());
            let excess1 = balance1.saturating_sub(&state.reserve1());
            if !excess0.is_zero() {
                ledger.transfer(pair.token0(), pair.address, to, excess0)?;
            }
            if !excess1.is_zero() {
                ledger.transfer(pair.token1(), pair.address, to, excess1)?;
            }
            Ok(())
        })
    }

    /// Sets the reserves to the current balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] if the pair is already mid-operation.
    /// - [`AmmError::Overflow`] if a balance exceeds 112 bits.
    pub fn sync(&self, ledger: &mut Ledger) -> Result<(), AmmError> {
        self.run(ledger, |pair, ledger, state| {
            let (balance0, balance1) = pair.balances(ledger)?;
            pair.commit_reserves(ledger, state, balance0, balance1)
        })
    }

    // ── helpers ───────────────────────────────────────────────────────

    fn balances(&self, ledger: &Ledger) -> Result<(Amount, Amount), AmmError> {
        Ok((
            ledger.balance_of(&self.token0(), &self.address)?,
            ledger.balance_of(&self.token1(), &self.address)?,
        ))
    }

    fn commit_reserves(
        &self,
        ledger: &mut Ledger,
        state: &mut PairState,
        balance0: Amount,
        balance1: Amount,
    ) -> Result<(), AmmError> {
        state.update(balance0, balance1, ledger.now())?;
        ledger.emit(Event::Sync {
            pair: self.address,
            reserve0: balance0,
            reserve1: balance1,
        });
        tracing::debug!("Synced pair {} to {} / {}", self.address, balance0, balance1);
        Ok(())
    }

    /// Mints the protocol's cut of fee growth since the last liquidity
    /// event.  Returns whether the protocol fee is on.
    ///
    /// With divisor `d`, the recipient gets `1 / (d + 1)` of the growth in
    /// `√k`:
    ///
    /// ```text
    /// shares = supply · (√k − √k_last) / (d · √k + √k_last)
    /// ```
    fn mint_fee(&self, ledger: &mut Ledger, state: &mut PairState) -> Result<bool, AmmError> {
        let fee_to = self.fee_settings.read().fee_to;
        let Some(fee_to) = fee_to else {
            if !state.k_last().is_zero() {
                state.clear_k_last();
            }
            return Ok(false);
        };
        if state.k_last().is_zero() {
            return Ok(true);
        }
        let root_k = state.k().sqrt();
        let root_k_last = state.k_last().sqrt();
        if root_k > root_k_last {
            let supply = wide(ledger.total_supply(&self.address)?);
            let numerator = supply * (&root_k - &root_k_last);
            let denominator =
                root_k * BigUint::from(self.config.protocol_fee_divisor()) + root_k_last;
            let liquidity = narrow(&(numerator / denominator), "protocol fee exceeds u128")?;
            if !liquidity.is_zero() {
                ledger.mint(self.address, self.address, fee_to, liquidity)?;
                tracing::debug!("Protocol fee of {} shares on pair {}", liquidity, self.address);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::math::get_amount_out;
    use crate::token::StandardToken;

    const ADMIN: Address = Address::repeat_byte(0xAD);
    const ALICE: Address = Address::repeat_byte(0xA1);
    const BOB: Address = Address::repeat_byte(0xB0);
    const FEE_TO: Address = Address::repeat_byte(0xFE);
    const TOKEN_A: Address = Address::repeat_byte(1);
    const TOKEN_B: Address = Address::repeat_byte(2);
    const E18: u128 = 1_000_000_000_000_000_000;

    fn amt(v: u128) -> Amount {
        Amount::new(v)
    }

    struct Fixture {
        factory: Factory,
        ledger: Ledger,
        pair: Arc<Pair>,
    }

    fn fixture_with(minimum_liquidity: u128) -> Fixture {
        let Ok(config) =
            ExchangeConfig::new(FeeTier::TIER_0_30_PERCENT, amt(minimum_liquidity), 5)
        else {
            panic!("valid config");
        };
        let Ok(factory) = Factory::new(ADMIN, config) else {
            panic!("valid factory");
        };
        let mut ledger = Ledger::new();
        for (address, symbol) in [(TOKEN_A, "A"), (TOKEN_B, "B")] {
            let Ok(token) = StandardToken::with_supply(address, symbol, symbol, ALICE, Amount::MAX)
            else {
                panic!("token");
            };
            let Ok(_) = ledger.register_token(token) else {
                panic!("register");
            };
        }
        let Ok(pair) = factory.create_pair(&mut ledger, TOKEN_A, TOKEN_B) else {
            panic!("create pair");
        };
        Fixture {
            factory,
            ledger,
            pair,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(1_000)
    }

    impl Fixture {
        fn pay(&mut self, token: Address, amount: u128) {
            let Ok(()) = self.ledger.transfer(token, ALICE, self.pair.address(), amt(amount)) else {
                panic!("pay {token}");
            };
        }

        fn deposit(&mut self, amount0: u128, amount1: u128) -> Result<Amount, AmmError> {
            self.pay(TOKEN_A, amount0);
            self.pay(TOKEN_B, amount1);
            self.pair.mint(&mut self.ledger, ALICE, ALICE)
        }

        fn balance(&self, token: Address, owner: Address) -> Amount {
            let Ok(balance) = self.ledger.balance_of(&token, &owner) else {
                panic!("balance");
            };
            balance
        }

        fn shares(&self, owner: Address) -> Amount {
            let Ok(balance) = self.pair.balance_of(&self.ledger, &owner) else {
                panic!("shares");
            };
            balance
        }
    }

    // ── mint ──────────────────────────────────────────────────────────

    #[test]
    fn first_mint_locks_minimum_liquidity() {
        let mut f = fixture();
        let Ok(minted) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("mint");
        };
        assert_eq!(minted, amt(1_000 * E18 - 1_000));
        assert_eq!(f.shares(ALICE), minted);
        assert_eq!(f.shares(Address::ZERO), amt(1_000));
        assert_eq!(f.pair.total_supply(&f.ledger), Ok(amt(1_000 * E18)));
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_000 * E18), amt(1_000 * E18)));
        assert!(f.ledger.events().iter().any(|e| matches!(e, Event::Mint { .. })));
    }

    #[test]
    fn first_mint_at_minimum_is_rejected() {
        let mut f = fixture();
        assert_eq!(f.deposit(1_000, 1_000), Err(AmmError::InsufficientLiquidityMinted));
        assert_eq!(f.pair.total_supply(&f.ledger), Ok(Amount::ZERO));
        assert_eq!(f.pair.reserves().0, Amount::ZERO);
    }

    #[test]
    fn later_mints_are_pro_rata_on_the_short_side() {
        let mut f = fixture();
        let Ok(_) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("first mint");
        };
        let Ok(minted) = f.deposit(100 * E18, 200 * E18) else {
            panic!("second mint");
        };
        assert_eq!(minted, amt(100 * E18));
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_100 * E18), amt(1_200 * E18)));
    }

    #[test]
    fn mint_without_deposit_is_rejected() {
        let mut f = fixture();
        let Ok(_) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("first mint");
        };
        assert_eq!(
            f.pair.mint(&mut f.ledger, ALICE, ALICE),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn mint_above_reserve_cap_overflows() {
        let mut f = fixture();
        let big = Amount::MAX_RESERVE.get() + 1;
        let Err(AmmError::Overflow(_)) = f.deposit(big, E18) else {
            panic!("expected Overflow");
        };
        assert_eq!(f.pair.total_supply(&f.ledger), Ok(Amount::ZERO));
        assert_eq!(f.pair.reserves().0, Amount::ZERO);
    }

    // ── burn ──────────────────────────────────────────────────────────

    #[test]
    fn burn_returns_pro_rata_balances() {
        let mut f = fixture();
        let Ok(minted) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("mint");
        };
        let pair_address = f.pair.address();
        let Ok(()) = f.pair.transfer(&mut f.ledger, ALICE, pair_address, minted) else {
            panic!("send shares");
        };
        let Ok((out0, out1)) = f.pair.burn(&mut f.ledger, ALICE, BOB) else {
            panic!("burn");
        };
        assert_eq!(out0, minted);
        assert_eq!(out1, minted);
        assert_eq!(f.balance(TOKEN_A, BOB), minted);
        assert_eq!(f.pair.total_supply(&f.ledger), Ok(amt(1_000)));
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_000), amt(1_000)));
    }

    #[test]
    fn burn_without_shares_is_rejected() {
        let mut f = fixture();
        let Ok(_) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("mint");
        };
        assert_eq!(
            f.pair.burn(&mut f.ledger, ALICE, BOB),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    // ── swap ──────────────────────────────────────────────────────────

    #[test]
    fn swap_hundred_into_thousand_pays_ninety() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        f.pay(TOKEN_A, 100);
        let Ok(()) = f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, amt(90), BOB, None) else {
            panic!("swap");
        };
        assert_eq!(f.balance(TOKEN_B, BOB), amt(90));
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_100), amt(910)));
        assert!(matches!(
            f.ledger.events().last(),
            Some(Event::Swap { amount0_in, amount1_out, .. })
                if *amount0_in == amt(100) && *amount1_out == amt(90)
        ));
    }

    #[test]
    fn swap_that_lowers_k_is_rejected_and_rolled_back() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        f.pay(TOKEN_A, 100);
        let events = f.ledger.events().len();
        assert_eq!(
            f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, amt(91), BOB, None),
            Err(AmmError::K)
        );
        assert_eq!(f.balance(TOKEN_B, BOB), Amount::ZERO);
        assert_eq!(f.ledger.events().len(), events);
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_000), amt(1_000)));
    }

    #[test]
    fn enclosing_failure_restores_committed_reserves() {
        let mut f = fixture();
        let Ok(_) = f.deposit(1_000 * E18, 1_000 * E18) else {
            panic!("mint");
        };
        let before = f.pair.state();
        let supply = f.pair.total_supply(&f.ledger);
        let pair = Arc::clone(&f.pair);
        let result: Result<(), AmmError> = f.ledger.atomic(|ledger| {
            for token in [TOKEN_A, TOKEN_B] {
                ledger.transfer(token, ALICE, pair.address(), amt(E18))?;
            }
            pair.mint(ledger, ALICE, ALICE)?;
            assert_ne!(pair.state(), before);
            Err(AmmError::Expired)
        });
        assert_eq!(result, Err(AmmError::Expired));
        assert_eq!(f.pair.state(), before);
        assert_eq!(f.pair.total_supply(&f.ledger), supply);
        assert_eq!(f.balance(TOKEN_A, f.pair.address()), amt(1_000 * E18));

        // the pair stays usable
        let Ok(minted) = f.deposit(E18, E18) else {
            panic!("mint after rollback");
        };
        assert_eq!(minted, amt(E18));
    }

    #[test]
    fn swap_argument_checks() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        let l = &mut f.ledger;
        assert_eq!(
            f.pair.swap(l, ALICE, Amount::ZERO, Amount::ZERO, BOB, None),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(
            f.pair.swap(l, ALICE, amt(1_000), Amount::ZERO, BOB, None),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            f.pair.swap(l, ALICE, amt(1), Amount::ZERO, TOKEN_B, None),
            Err(AmmError::InvalidTo)
        );
        assert_eq!(
            f.pair.swap(l, ALICE, Amount::ZERO, amt(10), BOB, None),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(f.balance(TOKEN_B, BOB), Amount::ZERO);
    }

    #[test]
    fn swap_grows_k() {
        let mut f = fixture();
        let Ok(_) = f.deposit(10 * E18, 5 * E18) else {
            panic!("mint");
        };
        let k_before = f.pair.state().k();
        let Ok(out) = get_amount_out(amt(E18), amt(5 * E18), amt(10 * E18), f.pair.fee_tier())
        else {
            panic!("quote");
        };
        f.pay(TOKEN_B, E18);
        let Ok(()) = f.pair.swap(&mut f.ledger, ALICE, out, Amount::ZERO, BOB, None) else {
            panic!("swap");
        };
        assert!(f.pair.state().k() > k_before);
    }

    // ── skim / sync / accumulators ────────────────────────────────────

    #[test]
    fn skim_sends_excess_and_keeps_reserves() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        f.pay(TOKEN_A, 50);
        let Ok(()) = f.pair.skim(&mut f.ledger, BOB) else {
            panic!("skim");
        };
        assert_eq!(f.balance(TOKEN_A, BOB), amt(50));
        assert_eq!(f.balance(TOKEN_A, f.pair.address()), amt(1_000));
        assert_eq!(f.pair.reserves().0, amt(1_000));
    }

    #[test]
    fn sync_adopts_balances() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        f.pay(TOKEN_A, 50);
        let Ok(()) = f.pair.sync(&mut f.ledger) else {
            panic!("sync");
        };
        let (r0, r1, _) = f.pair.reserves();
        assert_eq!((r0, r1), (amt(1_050), amt(1_000)));
        assert!(matches!(f.ledger.events().last(), Some(Event::Sync { .. })));
    }

    #[test]
    fn price_accumulators_advance_with_time() {
        let mut f = fixture_with(10);
        f.ledger.set_timestamp(Timestamp::new(1_000));
        let Ok(_) = f.deposit(1_000, 4_000) else {
            panic!("mint");
        };
        assert!(f.pair.price0_cumulative_last().is_zero());

        f.ledger.advance_time(10);
        let Ok(()) = f.pair.sync(&mut f.ledger) else {
            panic!("sync");
        };
        assert_eq!(f.pair.price0_cumulative_last(), BigUint::from(40u8) << 112);
        assert_eq!(f.pair.price1_cumulative_last(), (BigUint::from(10u8) << 112) / 4u8);
        assert_eq!(f.pair.reserves().2, Timestamp::new(1_010));
    }

    // ── protocol fee ──────────────────────────────────────────────────

    fn trade_back_and_forth(f: &mut Fixture) {
        for _ in 0..5 {
            let (r0, r1, _) = f.pair.reserves();
            let Ok(out) = get_amount_out(amt(E18), r0, r1, f.pair.fee_tier()) else {
                panic!("quote");
            };
            f.pay(TOKEN_A, E18);
            let Ok(()) = f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, out, ALICE, None) else {
                panic!("swap a->b");
            };
            let (r0, r1, _) = f.pair.reserves();
            let Ok(out) = get_amount_out(amt(E18), r1, r0, f.pair.fee_tier()) else {
                panic!("quote");
            };
            f.pay(TOKEN_B, E18);
            let Ok(()) = f.pair.swap(&mut f.ledger, ALICE, out, Amount::ZERO, ALICE, None) else {
                panic!("swap b->a");
            };
        }
    }

    #[test]
    fn protocol_fee_is_minted_when_switched_on() {
        let mut f = fixture();
        let Ok(()) = f.factory.set_fee_to(ADMIN, Some(FEE_TO)) else {
            panic!("fee on");
        };
        let Ok(_) = f.deposit(100 * E18, 100 * E18) else {
            panic!("mint");
        };
        assert_eq!(f.pair.k_last(), f.pair.state().k());

        trade_back_and_forth(&mut f);
        assert_eq!(f.shares(FEE_TO), Amount::ZERO);

        let Ok(_) = f.deposit(E18, E18) else {
            panic!("second mint");
        };
        assert!(f.shares(FEE_TO) > Amount::ZERO);
        assert_eq!(f.pair.k_last(), f.pair.state().k());
    }

    #[test]
    fn protocol_fee_off_mints_nothing_and_clears_k_last() {
        let mut f = fixture();
        let Ok(()) = f.factory.set_fee_to(ADMIN, Some(FEE_TO)) else {
            panic!("fee on");
        };
        let Ok(_) = f.deposit(100 * E18, 100 * E18) else {
            panic!("mint");
        };
        let Ok(()) = f.factory.set_fee_to(ADMIN, None) else {
            panic!("fee off");
        };
        trade_back_and_forth(&mut f);
        let Ok(_) = f.deposit(E18, E18) else {
            panic!("second mint");
        };
        assert_eq!(f.shares(FEE_TO), Amount::ZERO);
        assert!(f.pair.k_last().is_zero());
    }

    // ── flash swaps ───────────────────────────────────────────────────

    struct Repay {
        pair: Address,
        token: Address,
        amount: Amount,
        seen_reserves: Option<(Amount, Amount)>,
        view: Arc<Pair>,
    }

    impl FlashSwapCallee for Repay {
        fn on_flash_swap(
            &mut self,
            ledger: &mut Ledger,
            _sender: Address,
            _amount0: Amount,
            _amount1: Amount,
            data: &[u8],
        ) -> Result<(), AmmError> {
            assert_eq!(data, b"loan");
            let (r0, r1, _) = self.view.reserves();
            self.seen_reserves = Some((r0, r1));
            ledger.transfer(self.token, ALICE, self.pair, self.amount)
        }
    }

    struct Reenter {
        pair: Arc<Pair>,
    }

    impl FlashSwapCallee for Reenter {
        fn on_flash_swap(
            &mut self,
            ledger: &mut Ledger,
            _sender: Address,
            _amount0: Amount,
            _amount1: Amount,
            _data: &[u8],
        ) -> Result<(), AmmError> {
            self.pair.sync(ledger)
        }
    }

    fn flash_fixture() -> Fixture {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 1_000) else {
            panic!("mint");
        };
        f
    }

    fn repay(f: &Fixture, amount: u128) -> Repay {
        Repay {
            pair: f.pair.address(),
            token: TOKEN_B,
            amount: amt(amount),
            seen_reserves: None,
            view: Arc::clone(&f.pair),
        }
    }

    #[test]
    fn flash_swap_repaid_with_fee_succeeds() {
        let mut f = flash_fixture();
        let mut callee = repay(&f, 91);
        let flash = FlashSwap::new(&mut callee, b"loan");
        let Ok(()) = f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, amt(90), BOB, Some(flash))
        else {
            panic!("flash swap");
        };
        assert_eq!(callee.seen_reserves, Some((amt(1_000), amt(1_000))));
        assert_eq!(f.balance(TOKEN_B, BOB), amt(90));
        assert_eq!(f.pair.reserves().1, amt(1_001));
    }

    #[test]
    fn flash_swap_short_repayment_fails_k() {
        let mut f = flash_fixture();
        let mut callee = repay(&f, 90);
        let flash = FlashSwap::new(&mut callee, b"loan");
        assert_eq!(
            f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, amt(90), BOB, Some(flash)),
            Err(AmmError::K)
        );
        assert_eq!(f.balance(TOKEN_B, BOB), Amount::ZERO);
        assert_eq!(f.balance(TOKEN_B, f.pair.address()), amt(1_000));
    }

    #[test]
    fn flash_swap_reentry_is_locked() {
        let mut f = flash_fixture();
        let mut callee = Reenter {
            pair: Arc::clone(&f.pair),
        };
        let flash = FlashSwap::new(&mut callee, b"");
        assert_eq!(
            f.pair.swap(&mut f.ledger, ALICE, Amount::ZERO, amt(10), BOB, Some(flash)),
            Err(AmmError::Locked)
        );
        let Ok(()) = f.pair.sync(&mut f.ledger) else {
            panic!("lock released after the swap");
        };
    }

    // ── LP shares ─────────────────────────────────────────────────────

    #[test]
    fn lp_shares_transfer_with_allowance() {
        let mut f = fixture();
        let Ok(minted) = f.deposit(10 * E18, 10 * E18) else {
            panic!("mint");
        };
        let Ok(()) = f.pair.approve(&mut f.ledger, ALICE, BOB, amt(E18)) else {
            panic!("approve");
        };
        assert_eq!(f.pair.allowance(&f.ledger, &ALICE, &BOB), Ok(amt(E18)));
        let Ok(()) = f.pair.transfer_from(&mut f.ledger, BOB, ALICE, BOB, amt(E18)) else {
            panic!("transfer_from");
        };
        assert_eq!(f.shares(BOB), amt(E18));
        assert_eq!(f.shares(ALICE), amt(minted.get() - E18));
        let Err(AmmError::TransferFailed(_)) =
            f.pair.transfer_from(&mut f.ledger, BOB, ALICE, BOB, amt(1))
        else {
            panic!("allowance spent");
        };
    }

    #[test]
    fn reserves_for_orients_and_rejects_foreign_tokens() {
        let mut f = fixture_with(10);
        let Ok(_) = f.deposit(1_000, 3_000) else {
            panic!("mint");
        };
        assert_eq!(f.pair.reserves_for(&TOKEN_B), Ok((amt(3_000), amt(1_000))));
        assert_eq!(f.pair.reserves_for(&BOB), Err(AmmError::InvalidPath));
    }
}
