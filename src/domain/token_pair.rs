//! Canonically ordered pair of distinct token addresses.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// An unordered token pair stored in canonical order.
///
/// Construction sorts the two addresses so that `token0 < token1`; `(A, B)`
/// and `(B, A)` therefore produce the same value and index the same pair.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, TokenPair};
///
/// let a = Address::repeat_byte(1);
/// let b = Address::repeat_byte(2);
///
/// let pair = TokenPair::new(b, a).expect("distinct, non-zero");
/// assert_eq!(pair.token0(), a);
/// assert_eq!(pair.token1(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token0: Address,
    token1: Address,
}

impl TokenPair {
    /// Sorts two token addresses into a pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both addresses are equal.
    /// - [`AmmError::ZeroAddress`] if the smaller address is the zero
    ///   sentinel (and therefore either one is).
    pub fn new(token_a: Address, token_b: Address) -> Result<Self, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAddresses);
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        if token0.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self { token0, token1 })
    }

    /// The lower address.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// The higher address.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `token` is either side of the pair.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// Returns `true` if `token` is `token0`.
    #[must_use]
    pub fn is_token0(&self, token: &Address) -> bool {
        self.token0 == *token
    }

    /// Reorders `(amount_for_a, amount_for_b)` into `(amount0, amount1)`
    /// where `token_a` is the token the first value belongs to.
    #[must_use]
    pub fn orient<T>(&self, token_a: &Address, for_a: T, for_b: T) -> (T, T) {
        if self.is_token0(token_a) {
            (for_a, for_b)
        } else {
            (for_b, for_a)
        }
    }
}
