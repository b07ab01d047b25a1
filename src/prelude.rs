//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use pairswap::prelude::*;
//!
//! let pair = TokenPair::new(Address::repeat_byte(2), Address::repeat_byte(1)).expect("distinct");
//! assert_eq!(pair.token0(), Address::repeat_byte(1));
//! ```

pub use crate::config::ExchangeConfig;
pub use crate::domain::{Address, Amount, BasisPoints, Event, FeeTier, Path, Timestamp, TokenPair};
pub use crate::error::{AmmError, Result};
pub use crate::factory::{Factory, FeeSettings};
pub use crate::ledger::Ledger;
pub use crate::math::{CheckedArithmetic, Rounding};
pub use crate::pair::{FlashSwap, Pair, PairState};
pub use crate::router::Router;
pub use crate::token::{StandardToken, TokenBox, WrappedNativeToken};
pub use crate::traits::{FlashSwapCallee, TokenAdapter, WrappedNativeAdapter};
