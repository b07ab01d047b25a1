//! The reserve and invariant engine.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Pair`] | one pool: mint, burn, swap, skim, sync, LP shares |
//! | [`PairState`] | reserves, accumulators and `k_last` |
//! | [`FlashSwap`] | callback argument for flash swaps |

mod pool;
mod shares;
mod state;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use pool::{FlashSwap, Pair};
pub use state::PairState;
