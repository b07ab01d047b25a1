//! # Pairswap
//!
//! Constant-product token exchange engine: any two fungible tokens can be
//! pooled, priced and swapped against a pair's reserves without an order
//! book.  Liquidity providers hold LP shares and earn the swap fee pro
//! rata to their share of the pool.
//!
//! The engine runs entirely in memory against a [`Ledger`](ledger::Ledger)
//! that holds token balances, native currency, the block clock and the
//! event log.  Every operation is all-or-nothing.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pairswap::config::ExchangeConfig;
//! use pairswap::domain::{Address, Amount, Path, Timestamp};
//! use pairswap::factory::Factory;
//! use pairswap::ledger::Ledger;
//! use pairswap::router::Router;
//! use pairswap::token::{StandardToken, WrappedNativeToken};
//!
//! let user = Address::repeat_byte(0xA1);
//! let (usdc, dai) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! let weth = Address::repeat_byte(0xEE);
//!
//! // 1. A ledger with two tokens and a wrapped-native token
//! let mut ledger = Ledger::new();
//! for token in [usdc, dai] {
//!     let supply = Amount::new(1_000_000_000);
//!     ledger
//!         .register_token(StandardToken::with_supply(token, "Token", "TKN", user, supply).expect("token"))
//!         .expect("registered");
//! }
//! ledger.register_token(WrappedNativeToken::new(weth)).expect("registered");
//!
//! // 2. Factory and router
//! let factory = Arc::new(Factory::new(user, ExchangeConfig::default()).expect("factory"));
//! let router = Router::new(factory, weth, Address::repeat_byte(0x52)).expect("router");
//! for token in [usdc, dai] {
//!     ledger.approve(token, user, router.address(), Amount::MAX).expect("approved");
//! }
//!
//! // 3. Seed a pool and trade against it
//! let deadline = Timestamp::new(3_600);
//! router
//!     .add_liquidity(
//!         &mut ledger, user, usdc, dai,
//!         Amount::new(1_000_000), Amount::new(1_000_000),
//!         Amount::ZERO, Amount::ZERO, user, deadline,
//!     )
//!     .expect("liquidity added");
//!
//! let path = Path::new(vec![usdc, dai]).expect("two tokens");
//! let amounts = router
//!     .swap_exact_tokens_for_tokens(
//!         &mut ledger, user, Amount::new(100_000), Amount::ZERO, &path, user, deadline,
//!     )
//!     .expect("swapped");
//! assert_eq!(amounts[1], Amount::new(90_661));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Router     │  deadlines, slippage, native wrapping, multi-hop
//! └──────┬──────┘
//!        │ get-or-create pair
//!        ▼
//! ┌─────────────┐
//! │   Factory    │  deterministic registry, protocol fee switch
//! └──────┬──────┘
//!        │ Arc<Pair>
//!        ▼
//! ┌─────────────┐
//! │    Pair      │  reserves, x·y=k check, LP shares, TWAP accumulators
//! └──────┬──────┘
//!        │ token movement
//!        ▼
//! ┌─────────────┐
//! │   Ledger     │  tokens, native currency, clock, events, journal
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`Path`](domain::Path), [`Event`](domain::Event), etc. |
//! | [`math`]   | Checked arithmetic, wide `mul_div`, and the pricing library |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) shared by every pair |
//! | [`traits`] | [`TokenAdapter`](traits::TokenAdapter), [`WrappedNativeAdapter`](traits::WrappedNativeAdapter), [`FlashSwapCallee`](traits::FlashSwapCallee) |
//! | [`token`]  | In-memory tokens and the [`TokenBox`](token::TokenBox) dispatch enum |
//! | [`ledger`] | [`Ledger`](ledger::Ledger): balances, clock, events and rollback |
//! | [`pair`]   | [`Pair`](pair::Pair): the reserve and invariant engine |
//! | [`factory`] | [`Factory`](factory::Factory): pair registry |
//! | [`router`] | [`Router`](router::Router): user-facing entry points |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod router;
pub mod token;
pub mod traits;
