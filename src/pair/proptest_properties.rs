//! Property-based tests for the pair engine and the pricing library.
//!
//! 1. **Invariant growth**: a priced swap never lowers `reserve0 × reserve1`.
//! 2. **Round trip**: swapping A→B→A returns at most the original input.
//! 3. **Rounding favours the pool**: `in(out(x)) ≤ x` and `out(in(y)) ≥ y`.
//! 4. **Liquidity conservation**: deposit then withdraw returns at most
//!    the deposit.
//! 5. **Multi-hop**: the input required for a chained output never exceeds
//!    the input that produced it.

use std::sync::Arc;

use proptest::prelude::*;

use super::Pair;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, FeeTier, Path};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::ledger::Ledger;
use crate::math::{get_amount_in, get_amount_out, get_amounts_in, get_amounts_out};
use crate::token::StandardToken;

const ALICE: Address = Address::repeat_byte(0xA1);
const TOKEN_A: Address = Address::repeat_byte(1);
const TOKEN_B: Address = Address::repeat_byte(2);
const FEE: FeeTier = FeeTier::TIER_0_30_PERCENT;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn seeded_pair(reserve_a: u128, reserve_b: u128) -> (Ledger, Arc<Pair>) {
    let Ok(factory) = Factory::new(ALICE, ExchangeConfig::default()) else {
        panic!("valid factory");
    };
    let mut ledger = Ledger::new();
    for address in [TOKEN_A, TOKEN_B] {
        let Ok(token) = StandardToken::with_supply(address, "T", "T", ALICE, Amount::MAX) else {
            panic!("token");
        };
        let Ok(_) = ledger.register_token(token) else {
            panic!("register");
        };
    }
    let Ok(pair) = factory.create_pair(&mut ledger, TOKEN_A, TOKEN_B) else {
        panic!("create pair");
    };
    let Ok(()) = ledger.transfer(TOKEN_A, ALICE, pair.address(), Amount::new(reserve_a)) else {
        panic!("seed a");
    };
    let Ok(()) = ledger.transfer(TOKEN_B, ALICE, pair.address(), Amount::new(reserve_b)) else {
        panic!("seed b");
    };
    let Ok(_) = pair.mint(&mut ledger, ALICE, ALICE) else {
        panic!("seed mint");
    };
    (ledger, pair)
}

fn swap_exact_in(
    ledger: &mut Ledger,
    pair: &Pair,
    token_in: Address,
    amount_in: Amount,
) -> Result<Amount, AmmError> {
    let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;
    let out = get_amount_out(amount_in, reserve_in, reserve_out, pair.fee_tier())?;
    ledger.transfer(token_in, ALICE, pair.address(), amount_in)?;
    let (out0, out1) = if pair.token_pair().is_token0(&token_in) {
        (Amount::ZERO, out)
    } else {
        (out, Amount::ZERO)
    };
    pair.swap(ledger, ALICE, out0, out1, ALICE, None)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves large enough to clear the locked minimum comfortably.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000_000_000u128
}

/// Trade sizes from dust up to roughly the size of a reserve.
fn trade_strategy() -> impl Strategy<Value = u128> {
    1u128..=1_000_000_000_000_000_000_000u128
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_never_lowers_k(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amount in trade_strategy(),
    ) {
        let (mut ledger, pair) = seeded_pair(ra, rb);
        let before = pair.state().k();
        let Ok(_) = swap_exact_in(&mut ledger, &pair, TOKEN_A, Amount::new(amount)) else {
            return Ok(());
        };
        let after = pair.state().k();
        prop_assert!(after >= before, "k fell from {} to {}", before, after);
    }

    #[test]
    fn prop_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amount in trade_strategy(),
    ) {
        let (mut ledger, pair) = seeded_pair(ra, rb);
        let Ok(received) = swap_exact_in(&mut ledger, &pair, TOKEN_A, Amount::new(amount)) else {
            return Ok(());
        };
        let Ok(back) = swap_exact_in(&mut ledger, &pair, TOKEN_B, received) else {
            return Ok(());
        };
        prop_assert!(
            back.get() <= amount,
            "round trip gained value: {} > {}",
            back, amount
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_amount_in_of_amount_out_never_exceeds_input(
        r_in in reserve_strategy(),
        r_out in reserve_strategy(),
        amount in trade_strategy(),
    ) {
        let (r_in, r_out) = (Amount::new(r_in), Amount::new(r_out));
        let Ok(out) = get_amount_out(Amount::new(amount), r_in, r_out, FEE) else {
            return Ok(());
        };
        prop_assume!(!out.is_zero());
        let Ok(needed) = get_amount_in(out, r_in, r_out, FEE) else {
            return Ok(());
        };
        prop_assert!(needed.get() <= amount, "needed {} > paid {}", needed, amount);
    }

    #[test]
    fn prop_amount_out_of_amount_in_covers_request(
        r_in in reserve_strategy(),
        r_out in reserve_strategy(),
        wanted in trade_strategy(),
    ) {
        prop_assume!(wanted < r_out);
        let (r_in, r_out) = (Amount::new(r_in), Amount::new(r_out));
        let Ok(needed) = get_amount_in(Amount::new(wanted), r_in, r_out, FEE) else {
            return Ok(());
        };
        let Ok(out) = get_amount_out(needed, r_in, r_out, FEE) else {
            return Ok(());
        };
        prop_assert!(out.get() >= wanted, "got {} < wanted {}", out, wanted);
    }

    #[test]
    fn prop_multi_hop_input_bounded(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        r2 in reserve_strategy(),
        r3 in reserve_strategy(),
        amount in trade_strategy(),
    ) {
        let tokens = vec![TOKEN_A, TOKEN_B, Address::repeat_byte(3)];
        let Ok(path) = Path::new(tokens) else {
            panic!("valid path");
        };
        let reserves = |a: Address, _b: Address| -> Result<(Amount, Amount), AmmError> {
            if a == TOKEN_A {
                Ok((Amount::new(r0), Amount::new(r1)))
            } else {
                Ok((Amount::new(r2), Amount::new(r3)))
            }
        };
        let Ok(outs) = get_amounts_out(Amount::new(amount), &path, FEE, reserves) else {
            return Ok(());
        };
        let last = outs[outs.len() - 1];
        prop_assume!(!last.is_zero());
        let Ok(ins) = get_amounts_in(last, &path, FEE, reserves) else {
            return Ok(());
        };
        prop_assert_eq!(ins.len(), 3);
        prop_assert!(ins[0].get() <= amount, "needed {} > paid {}", ins[0], amount);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_withdraw_never_profits(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        add_a in reserve_strategy(),
        add_b in reserve_strategy(),
    ) {
        let (mut ledger, pair) = seeded_pair(ra, rb);
        let lp = Address::repeat_byte(0x77);
        let Ok(()) = ledger.transfer(TOKEN_A, ALICE, pair.address(), Amount::new(add_a)) else {
            panic!("pay a");
        };
        let Ok(()) = ledger.transfer(TOKEN_B, ALICE, pair.address(), Amount::new(add_b)) else {
            panic!("pay b");
        };
        let Ok(shares) = pair.mint(&mut ledger, ALICE, lp) else {
            return Ok(());
        };
        let Ok(()) = pair.transfer(&mut ledger, lp, pair.address(), shares) else {
            panic!("return shares");
        };
        let Ok((out0, out1)) = pair.burn(&mut ledger, lp, lp) else {
            return Ok(());
        };
        prop_assert!(out0.get() <= add_a, "token0 {} > {}", out0, add_a);
        prop_assert!(out1.get() <= add_b, "token1 {} > {}", out1, add_b);
    }
}
