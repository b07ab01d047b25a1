//! Multi-hop swap route.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// An ordered route of at least two tokens.
///
/// Each consecutive pair of tokens is one hop through one pair.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Address, Path};
///
/// let (a, b, c) = (Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3));
/// let path = Path::new(vec![a, b, c]).expect("two hops");
/// assert_eq!(path.hop_count(), 2);
/// assert_eq!(path.first(), a);
/// assert_eq!(path.last(), c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Address>", into = "Vec<Address>")]
pub struct Path(Vec<Address>);

impl Path {
    /// Validates and wraps a route.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if fewer than two tokens are given.
    pub fn new(tokens: Vec<Address>) -> Result<Self, AmmError> {
        if tokens.len() < 2 {
            return Err(AmmError::InvalidPath);
        }
        Ok(Self(tokens))
    }

    /// Token sold into the first hop.
    #[must_use]
    pub fn first(&self) -> Address {
        self.0[0]
    }

    /// Token bought out of the last hop.
    #[must_use]
    pub fn last(&self) -> Address {
        self.0[self.0.len() - 1]
    }

    /// Number of tokens on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pairs traversed (`len − 1`).
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    /// `(input, output)` token of every hop, in route order.
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = (Address, Address)> + ExactSizeIterator + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// The token addresses on the route.
    #[must_use]
    pub fn tokens(&self) -> &[Address] {
        &self.0
    }
}

impl TryFrom<Vec<Address>> for Path {
    type Error = AmmError;

    fn try_from(tokens: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<Path> for Vec<Address> {
    fn from(path: Path) -> Self {
        path.0
    }
}
