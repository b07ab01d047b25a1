//! Rounding direction for integer division.
//!
//! # Convention
//!
//! **Always round against the trader** (pool-favourable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap output, shares minted, tokens returned on burn | [`Rounding::Down`] |
//! | Input required for an exact output | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use pairswap::domain::Amount;
//! use pairswap::math::{mul_div, Rounding};
//!
//! let (ten, one, three) = (Amount::new(10), Amount::new(1), Amount::new(3));
//! assert_eq!(mul_div(ten, one, three, Rounding::Down), Ok(Amount::new(3)));
//! assert_eq!(mul_div(ten, one, three, Rounding::Up), Ok(Amount::new(4)));
//! ```

/// Direction in which a division result is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Towards positive infinity (ceiling).
    Up,
    /// Towards zero (floor).
    Down,
}
