//! Token balances, native currency, block time and the event log.
//!
//! The [`Ledger`] is the one piece of mutable state every exchange
//! operation receives by `&mut` reference.  Pairs keep only their reserves
//! and accumulators; their LP shares are a token registered in the ledger
//! at the pair's own address.

mod journal;
mod state;

pub use state::Ledger;
