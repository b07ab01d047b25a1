//! Exchange configuration.
//!
//! [`ExchangeConfig`] holds the parameters every pair of a deployment
//! shares: the swap fee, the locked minimum liquidity and the protocol
//! fee share.

mod exchange;

pub use exchange::ExchangeConfig;
