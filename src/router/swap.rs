//! Exact-input and exact-output swaps, with native-currency variants.
//!
//! Amounts for the whole route are computed up front from live reserves.
//! The caller's input goes straight to the first pair and every hop pays
//! its output directly into the next pair, so the router only ever holds
//! tokens while wrapping or unwrapping.

use super::unit_of_work::{execute, UnitOfWork};
use super::Router;
use crate::domain::{Address, Amount, Path, Timestamp};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::ledger::Ledger;

fn final_amount(amounts: &[Amount]) -> Amount {
    amounts.last().copied().unwrap_or(Amount::ZERO)
}

impl Router {
    /// Executes every hop of `path` for precomputed `amounts`, paying the
    /// final output to `to`.
    fn route(
        &self,
        work: &UnitOfWork<'_>,
        ledger: &mut Ledger,
        amounts: &[Amount],
        path: &Path,
        to: Address,
    ) -> Result<(), AmmError> {
        let tokens = path.tokens();
        for (index, (input, output)) in path.hops().enumerate() {
            let pair = work.pair(input, output)?;
            let amount_out = amounts[index + 1];
            let (amount0_out, amount1_out) =
                pair.token_pair().orient(&input, Amount::ZERO, amount_out);
            let recipient = match tokens.get(index + 2) {
                Some(next) => Factory::pair_for(output, *next)?,
                None => to,
            };
            pair.swap(ledger, self.address, amount0_out, amount1_out, recipient, None)?;
            tracing::debug!(
                "Hop {} -> {} via {}: {} out to {}",
                input,
                output,
                pair.address(),
                amount_out,
                recipient
            );
        }
        Ok(())
    }

    /// Address of the first pair on `path`.
    fn first_pair(&self, work: &UnitOfWork<'_>, path: &Path) -> Result<Address, AmmError> {
        let tokens = path.tokens();
        Ok(work.pair(tokens[0], tokens[1])?.address())
    }

    /// Moves `amount` of the route's first token from `caller` into the
    /// first pair using the router's allowance.
    fn fund_from_caller(
        &self,
        work: &UnitOfWork<'_>,
        ledger: &mut Ledger,
        caller: Address,
        path: &Path,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let first = self.first_pair(work, path)?;
        ledger.transfer_from(path.first(), self.address, caller, first, amount)
    }

    /// Wraps `amount` of `caller`'s `value` into the first pair and returns
    /// the unused native remainder to `caller`.
    fn fund_from_native(
        &self,
        work: &UnitOfWork<'_>,
        ledger: &mut Ledger,
        caller: Address,
        path: &Path,
        value: Amount,
        amount: Amount,
    ) -> Result<Amount, AmmError> {
        let first = self.first_pair(work, path)?;
        let refund = self.collect_native(ledger, caller, value, amount)?;
        ledger.transfer(self.weth, self.address, first, amount)?;
        Ok(refund)
    }

    /// Sells exactly `amount_in` of `path.first()` for as much of
    /// `path.last()` as the route yields, which must be at least
    /// `amount_out_min`.
    ///
    /// Returns the amount at every step of the route.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::InsufficientOutputAmount`] if the output is below
    ///   `amount_out_min`.
    /// - [`AmmError::PairNotFound`] if a hop has no pair.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_exact_tokens_for_tokens", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            let amounts = self.get_amounts_out(amount_in, path)?;
            if final_amount(&amounts) < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            self.fund_from_caller(work, ledger, caller, path, amounts[0])?;
            self.route(work, ledger, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of `path.last()`, spending at most
    /// `amount_in_max` of `path.first()`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] past the deadline.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `amount_in_max`.
    /// - [`AmmError::PairNotFound`] if a hop has no pair.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_tokens_for_exact_tokens", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            let amounts = self.get_amounts_in(amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(AmmError::ExcessiveInputAmount);
            }
            self.fund_from_caller(work, ledger, caller, path, amounts[0])?;
            self.route(work, ledger, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Sells all of `value` native currency along a route starting at the
    /// wrapped-native token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] unless `path.first()` is the
    ///   wrapped-native token.
    /// - Otherwise as [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens).
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_eth_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
        value: Amount,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_exact_eth_for_tokens", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            if path.first() != self.weth {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_out(value, path)?;
            if final_amount(&amounts) < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            let refund = self.fund_from_native(work, ledger, caller, path, value, amounts[0])?;
            self.route(work, ledger, &amounts, path, to)?;
            ledger.transfer_native(self.address, caller, refund)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` native currency for at most
    /// `amount_in_max` of `path.first()`; the route must end at the
    /// wrapped-native token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] unless `path.last()` is the
    ///   wrapped-native token.
    /// - Otherwise as [`swap_tokens_for_exact_tokens`](Self::swap_tokens_for_exact_tokens).
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_eth(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_tokens_for_exact_eth", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            if path.last() != self.weth {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_in(amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(AmmError::ExcessiveInputAmount);
            }
            self.fund_from_caller(work, ledger, caller, path, amounts[0])?;
            self.route(work, ledger, &amounts, path, self.address)?;
            self.pay_native(ledger, to, final_amount(&amounts))?;
            Ok(amounts)
        })
    }

    /// Sells exactly `amount_in` of `path.first()` for at least
    /// `amount_out_min` native currency; the route must end at the
    /// wrapped-native token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] unless `path.last()` is the
    ///   wrapped-native token.
    /// - Otherwise as [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens).
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_eth(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_exact_tokens_for_eth", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            if path.last() != self.weth {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_out(amount_in, path)?;
            if final_amount(&amounts) < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            self.fund_from_caller(work, ledger, caller, path, amounts[0])?;
            self.route(work, ledger, &amounts, path, self.address)?;
            self.pay_native(ledger, to, final_amount(&amounts))?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of `path.last()` with native currency,
    /// refunding whatever part of `value` the route did not need.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] unless `path.first()` is the
    ///   wrapped-native token.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `value`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_eth_for_exact_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out: Amount,
        path: &Path,
        to: Address,
        deadline: Timestamp,
        value: Amount,
    ) -> Result<Vec<Amount>, AmmError> {
        execute(&self.factory, ledger, "swap_eth_for_exact_tokens", |work, ledger| {
            Self::ensure(ledger, deadline)?;
            if path.first() != self.weth {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_in(amount_out, path)?;
            if amounts[0] > value {
                return Err(AmmError::ExcessiveInputAmount);
            }
            let refund = self.fund_from_native(work, ledger, caller, path, value, amounts[0])?;
            self.route(work, ledger, &amounts, path, to)?;
            ledger.transfer_native(self.address, caller, refund)?;
            Ok(amounts)
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ExchangeConfig;
    use crate::math::get_amount_out;
    use crate::token::{StandardToken, WrappedNativeToken};

    const ADMIN: Address = Address::repeat_byte(0xAD);
    const USER: Address = Address::repeat_byte(0xA1);
    const BOB: Address = Address::repeat_byte(0xB0);
    const TOKEN_A: Address = Address::repeat_byte(1);
    const TOKEN_B: Address = Address::repeat_byte(2);
    const WETH: Address = Address::repeat_byte(0xEE);
    const ROUTER: Address = Address::repeat_byte(0x52);
    const E18: u128 = 1_000_000_000_000_000_000;
    const DEADLINE: Timestamp = Timestamp::new(3_600);

    fn amt(v: u128) -> Amount {
        Amount::new(v)
    }

    fn path(tokens: &[Address]) -> Path {
        let Ok(path) = Path::new(tokens.to_vec()) else {
            panic!("valid path");
        };
        path
    }

    /// A/B 1000:1000, A/WETH 100:10, B/WETH 200:10.
    fn setup() -> (Router, Ledger) {
        let Ok(factory) = Factory::new(ADMIN, ExchangeConfig::default()) else {
            panic!("factory");
        };
        let Ok(router) = Router::new(Arc::new(factory), WETH, ROUTER) else {
            panic!("router");
        };
        let mut ledger = Ledger::new();
        for address in [TOKEN_A, TOKEN_B] {
            let Ok(token) = StandardToken::with_supply(address, "T", "T", USER, amt(10_000 * E18))
            else {
                panic!("token");
            };
            let Ok(_) = ledger.register_token(token) else {
                panic!("register");
            };
            let Ok(()) = ledger.approve(address, USER, ROUTER, Amount::MAX) else {
                panic!("approve");
            };
        }
        let Ok(_) = ledger.register_token(WrappedNativeToken::new(WETH)) else {
            panic!("weth");
        };
        let Ok(()) = ledger.credit_native(USER, amt(100 * E18)) else {
            panic!("native");
        };
        let z = Amount::ZERO;
        let Ok(_) = router.add_liquidity(
            &mut ledger, USER, TOKEN_A, TOKEN_B, amt(1_000 * E18), amt(1_000 * E18), z, z, USER,
            DEADLINE,
        ) else {
            panic!("a/b");
        };
        for (token, amount) in [(TOKEN_A, 100 * E18), (TOKEN_B, 200 * E18)] {
            let Ok(_) = router.add_liquidity_eth(
                &mut ledger, USER, token, amt(amount), z, z, amt(10 * E18), USER, DEADLINE,
            ) else {
                panic!("eth pool");
            };
        }
        (router, ledger)
    }

    fn balance(ledger: &Ledger, token: Address, owner: Address) -> Amount {
        let Ok(b) = ledger.balance_of(&token, &owner) else {
            panic!("balance");
        };
        b
    }

    #[test]
    fn exact_tokens_for_tokens_single_hop() {
        let (router, mut ledger) = setup();
        let expected = get_amount_out(
            amt(100 * E18),
            amt(1_000 * E18),
            amt(1_000 * E18),
            router.factory().config().fee_tier(),
        );
        let Ok(amounts) = router.swap_exact_tokens_for_tokens(
            &mut ledger, USER, amt(100 * E18), Amount::ZERO, &path(&[TOKEN_A, TOKEN_B]), BOB,
            DEADLINE,
        ) else {
            panic!("swap");
        };
        assert_eq!(Ok(amounts[1]), expected);
        assert_eq!(balance(&ledger, TOKEN_B, BOB), amounts[1]);
    }

    #[test]
    fn output_below_minimum_is_rejected() {
        let (router, mut ledger) = setup();
        let before = balance(&ledger, TOKEN_A, USER);
        assert_eq!(
            router.swap_exact_tokens_for_tokens(
                &mut ledger, USER, amt(100 * E18), amt(100 * E18), &path(&[TOKEN_A, TOKEN_B]),
                BOB, DEADLINE,
            ),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(balance(&ledger, TOKEN_A, USER), before);
    }

    #[test]
    fn expired_swap_is_rejected() {
        let (router, mut ledger) = setup();
        ledger.advance_time(3_601);
        assert_eq!(
            router.swap_exact_tokens_for_tokens(
                &mut ledger, USER, amt(E18), Amount::ZERO, &path(&[TOKEN_A, TOKEN_B]), BOB,
                DEADLINE,
            ),
            Err(AmmError::Expired)
        );
    }

    #[test]
    fn tokens_for_exact_tokens_respects_maximum() {
        let (router, mut ledger) = setup();
        let route = path(&[TOKEN_A, TOKEN_B]);
        let Ok(quoted) = router.get_amounts_in(amt(10 * E18), &route) else {
            panic!("quote");
        };
        assert_eq!(
            router.swap_tokens_for_exact_tokens(
                &mut ledger, USER, amt(10 * E18), amt(quoted[0].get() - 1), &route, BOB, DEADLINE,
            ),
            Err(AmmError::ExcessiveInputAmount)
        );
        let Ok(amounts) = router.swap_tokens_for_exact_tokens(
            &mut ledger, USER, amt(10 * E18), quoted[0], &route, BOB, DEADLINE,
        ) else {
            panic!("swap");
        };
        assert_eq!(amounts, quoted);
        assert_eq!(balance(&ledger, TOKEN_B, BOB), amt(10 * E18));
    }

    #[test]
    fn two_hops_equal_composed_single_hops() {
        let (router, mut ledger) = setup();
        let fee = router.factory().config().fee_tier();
        let Ok((ra, rw1)) = router.reserves(TOKEN_A, WETH) else {
            panic!("reserves");
        };
        let Ok((rw2, rb)) = router.reserves(WETH, TOKEN_B) else {
            panic!("reserves");
        };
        let Ok(mid) = get_amount_out(amt(10 * E18), ra, rw1, fee) else {
            panic!("hop 1");
        };
        let Ok(out) = get_amount_out(mid, rw2, rb, fee) else {
            panic!("hop 2");
        };
        let Ok(amounts) = router.swap_exact_tokens_for_tokens(
            &mut ledger, USER, amt(10 * E18), Amount::ZERO, &path(&[TOKEN_A, WETH, TOKEN_B]), BOB,
            DEADLINE,
        ) else {
            panic!("multi-hop");
        };
        assert_eq!(amounts, vec![amt(10 * E18), mid, out]);
        assert_eq!(balance(&ledger, TOKEN_B, BOB), out);
        assert_eq!(balance(&ledger, WETH, ROUTER), Amount::ZERO);
    }

    #[test]
    fn failing_last_hop_rolls_back_first_hop() {
        let (router, mut ledger) = setup();
        let Some(first) = router.factory().pair_by_tokens(TOKEN_A, WETH) else {
            panic!("pair");
        };
        let before = first.reserves();
        assert_eq!(
            router.swap_exact_tokens_for_tokens(
                &mut ledger, USER, amt(10 * E18), Amount::ZERO, &path(&[TOKEN_A, WETH, TOKEN_B]),
                TOKEN_B, DEADLINE,
            ),
            Err(AmmError::InvalidTo)
        );
        assert_eq!(first.reserves(), before);
        assert_eq!(balance(&ledger, WETH, first.address()), before.1);
        assert_eq!(balance(&ledger, TOKEN_A, first.address()), before.0);
    }

    #[test]
    fn exact_eth_for_tokens() {
        let (router, mut ledger) = setup();
        let native_before = ledger.native_balance(&USER);
        let Ok(amounts) = router.swap_exact_eth_for_tokens(
            &mut ledger, USER, Amount::ZERO, &path(&[WETH, TOKEN_A]), USER, DEADLINE, amt(E18),
        ) else {
            panic!("swap");
        };
        assert!(amounts[1] > Amount::ZERO);
        assert_eq!(ledger.native_balance(&USER), amt(native_before.get() - E18));
        assert_eq!(
            router.swap_exact_eth_for_tokens(
                &mut ledger, USER, Amount::ZERO, &path(&[TOKEN_A, WETH]), USER, DEADLINE,
                amt(E18),
            ),
            Err(AmmError::InvalidPath)
        );
    }

    #[test]
    fn eth_for_exact_tokens_refunds_change() {
        let (router, mut ledger) = setup();
        let route = path(&[WETH, TOKEN_A]);
        let Ok(quoted) = router.get_amounts_in(amt(E18), &route) else {
            panic!("quote");
        };
        let native_before = ledger.native_balance(&USER);
        let Ok(amounts) = router.swap_eth_for_exact_tokens(
            &mut ledger, USER, amt(E18), &route, BOB, DEADLINE, amt(5 * E18),
        ) else {
            panic!("swap");
        };
        assert_eq!(amounts, quoted);
        assert_eq!(balance(&ledger, TOKEN_A, BOB), amt(E18));
        assert_eq!(ledger.native_balance(&USER), amt(native_before.get() - quoted[0].get()));
        assert_eq!(ledger.native_balance(&ROUTER), Amount::ZERO);
        assert_eq!(
            router.swap_eth_for_exact_tokens(
                &mut ledger, USER, amt(E18), &route, BOB, DEADLINE, amt(1),
            ),
            Err(AmmError::ExcessiveInputAmount)
        );
    }

    #[test]
    fn tokens_for_eth_both_directions() {
        let (router, mut ledger) = setup();
        let route = path(&[TOKEN_A, WETH]);
        let Ok(amounts) = router.swap_exact_tokens_for_eth(
            &mut ledger, USER, amt(E18), Amount::ZERO, &route, BOB, DEADLINE,
        ) else {
            panic!("exact in");
        };
        assert_eq!(ledger.native_balance(&BOB), amounts[1]);

        let Ok(amounts) = router.swap_tokens_for_exact_eth(
            &mut ledger, USER, amt(E18 / 10), amt(100 * E18), &route, BOB, DEADLINE,
        ) else {
            panic!("exact out");
        };
        assert_eq!(amounts[1], amt(E18 / 10));
        assert_eq!(ledger.native_balance(&ROUTER), Amount::ZERO);
        assert_eq!(
            router.swap_exact_tokens_for_eth(
                &mut ledger, USER, amt(E18), Amount::ZERO, &path(&[WETH, TOKEN_A]), BOB, DEADLINE,
            ),
            Err(AmmError::InvalidPath)
        );
    }

    #[test]
    fn native_swaps_reject_routes_with_wrong_endpoint() {
        let (router, mut ledger) = setup();
        type NativeSwap = fn(&Router, &mut Ledger, &Path) -> Result<Vec<Amount>, AmmError>;
        let swaps: [(&str, NativeSwap, [Address; 2]); 4] = [
            (
                "swap_exact_eth_for_tokens",
                |r: &Router, l: &mut Ledger, p: &Path| {
                    r.swap_exact_eth_for_tokens(l, USER, Amount::ZERO, p, BOB, DEADLINE, amt(E18))
                },
                [TOKEN_A, WETH],
            ),
            (
                "swap_tokens_for_exact_eth",
                |r: &Router, l: &mut Ledger, p: &Path| {
                    let (out, max) = (amt(E18 / 10), amt(100 * E18));
                    r.swap_tokens_for_exact_eth(l, USER, out, max, p, BOB, DEADLINE)
                },
                [WETH, TOKEN_A],
            ),
            (
                "swap_exact_tokens_for_eth",
                |r: &Router, l: &mut Ledger, p: &Path| {
                    r.swap_exact_tokens_for_eth(l, USER, amt(E18), Amount::ZERO, p, BOB, DEADLINE)
                },
                [WETH, TOKEN_A],
            ),
            (
                "swap_eth_for_exact_tokens",
                |r: &Router, l: &mut Ledger, p: &Path| {
                    r.swap_eth_for_exact_tokens(l, USER, amt(E18 / 10), p, BOB, DEADLINE, amt(E18))
                },
                [TOKEN_A, WETH],
            ),
        ];
        let native = ledger.native_balance(&USER);
        let a = balance(&ledger, TOKEN_A, USER);
        for (name, swap, reversed) in swaps {
            for route in [path(&reversed), path(&[TOKEN_A, TOKEN_B])] {
                assert_eq!(swap(&router, &mut ledger, &route), Err(AmmError::InvalidPath), "{name}");
            }
        }
        assert_eq!(ledger.native_balance(&USER), native);
        assert_eq!(balance(&ledger, TOKEN_A, USER), a);
        assert_eq!(ledger.native_balance(&BOB), Amount::ZERO);
    }
}
