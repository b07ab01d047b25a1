//! Pair creation and the protocol fee switch.
//!
//! The [`Factory`] is the registry of every pair: it derives each pair's
//! address from its two tokens, creates the pair on first request and
//! answers lookups in either token order.  It also owns the
//! [`FeeSettings`] that all of its pairs consult when minting the
//! protocol fee.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pairswap::config::ExchangeConfig;
//! use pairswap::domain::Address;
//! use pairswap::factory::Factory;
//!
//! let admin = Address::repeat_byte(0xAD);
//! let factory = Arc::new(Factory::new(admin, ExchangeConfig::default()).expect("valid"));
//!
//! factory
//!     .set_fee_to(admin, Some(Address::repeat_byte(0xFE)))
//!     .expect("admin may switch the fee on");
//! assert!(factory.fee_to().is_some());
//! ```

mod fee_settings;
mod pair_factory;

pub use fee_settings::FeeSettings;
pub use pair_factory::Factory;
pub(crate) use pair_factory::PairRegistry;
