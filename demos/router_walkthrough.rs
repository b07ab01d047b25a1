//! Walks through a small exchange: two tokens, a wrapped-native token, a
//! direct pool and two native pools, then a multi-hop trade.
//!
//! Run with `RUST_LOG=pairswap=debug` to see every hop and sync.

use std::error::Error;
use std::sync::Arc;

use pairswap::prelude::*;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pairswap=info".parse()?),
        )
        .init();

    let e18 = 1_000_000_000_000_000_000u128;
    let ether = |v: u128| Amount::new(v * e18);

    let admin = Address::repeat_byte(0xAD);
    let user = Address::repeat_byte(0xA1);
    let (token_a, token_b) = (Address::repeat_byte(0x0A), Address::repeat_byte(0x0B));
    let weth = Address::repeat_byte(0xEE);

    let mut ledger = Ledger::new();
    ledger.register_token(WrappedNativeToken::new(weth))?;
    for (token, symbol) in [(token_a, "TKA"), (token_b, "TKB")] {
        ledger.register_token(StandardToken::with_supply(token, symbol, symbol, user, ether(10_000))?)?;
    }
    ledger.credit_native(user, ether(100))?;

    let factory = Arc::new(Factory::new(admin, ExchangeConfig::default())?);
    let router = Router::new(Arc::clone(&factory), weth, Address::repeat_byte(0x52))?;
    for token in [token_a, token_b] {
        ledger.approve(token, user, router.address(), Amount::MAX)?;
    }
    let deadline = ledger.now().plus(3_600);

    let (a, b, shares) = router.add_liquidity(
        &mut ledger, user, token_a, token_b, ether(1_000), ether(1_000),
        Amount::ZERO, Amount::ZERO, user, deadline,
    )?;
    tracing::info!("A/B pool seeded with {} / {} for {} shares", a, b, shares);

    for (token, amount) in [(token_a, 100), (token_b, 200)] {
        let (t, eth, shares) = router.add_liquidity_eth(
            &mut ledger, user, token, ether(amount), Amount::ZERO, Amount::ZERO,
            ether(1), user, deadline,
        )?;
        tracing::info!("{}/WETH pool seeded with {} / {} for {} shares", token, t, eth, shares);
    }

    let route = Path::new(vec![token_a, weth, token_b])?;
    let quoted = router.get_amounts_out(ether(10), &route)?;
    let amounts = router.swap_exact_tokens_for_tokens(
        &mut ledger, user, ether(10), quoted[2], &route, user, deadline,
    )?;
    tracing::info!("Sold {} A through WETH for {} B", amounts[0], amounts[2]);

    ledger.advance_time(3_601);
    match router.swap_exact_eth_for_tokens(
        &mut ledger, user, Amount::ZERO, &Path::new(vec![weth, token_a])?, user, deadline, ether(1),
    ) {
        Err(AmmError::Expired) => tracing::info!("Late trade rejected as expected"),
        other => tracing::warn!("Unexpected outcome for a late trade: {:?}", other),
    }

    tracing::info!(
        "{} pairs, {} events, user holds {} native",
        factory.all_pairs_len(),
        ledger.events().len(),
        ledger.native_balance(&user)
    );
    Ok(())
}
