//! 256-bit intermediates for products of two `u128` amounts.
//!
//! Reserves are capped at `2^112 − 1`, but the swap formulas multiply three
//! factors (amount, fee multiplier, reserve) and the invariant check
//! multiplies two scaled balances.  Both overflow `u128` for realistic
//! 18-decimal tokens, so every such product goes through [`BigUint`] and is
//! narrowed back to [`Amount`] only after the division.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use super::Rounding;
use crate::domain::Amount;
use crate::error::AmmError;

/// Widens an amount into a [`BigUint`].
#[must_use]
pub fn wide(amount: Amount) -> BigUint {
    BigUint::from(amount.get())
}

/// Narrows a [`BigUint`] back into an [`Amount`].
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if the value exceeds
/// `u128::MAX`.
pub fn narrow(value: &BigUint, context: &'static str) -> Result<Amount, AmmError> {
    value
        .to_u128()
        .map(Amount::new)
        .ok_or(AmmError::Overflow(context))
}

/// Computes `a × b / denominator` with a 256-bit intermediate product.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Amount;
/// use pairswap::math::{mul_div, Rounding};
///
/// let big = Amount::new(u128::MAX);
/// assert_eq!(mul_div(big, Amount::new(2), Amount::new(4), Rounding::Down), Ok(Amount::new(u128::MAX / 2)));
/// ```
pub fn mul_div(
    a: Amount,
    b: Amount,
    denominator: Amount,
    rounding: Rounding,
) -> Result<Amount, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let product = wide(a) * wide(b);
    let quotient = div_wide(&product, &wide(denominator), rounding);
    narrow(&quotient, "mul_div result exceeds u128")
}

/// Divides two wide values with explicit rounding.  `denominator` must be
/// non-zero.
pub(crate) fn div_wide(numerator: &BigUint, denominator: &BigUint, rounding: Rounding) -> BigUint {
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => quotient,
        Rounding::Up => {
            if (numerator % denominator).is_zero() {
                quotient
            } else {
                quotient + 1u32
            }
        }
    }
}

/// `floor(√(a × b))`.
///
/// The product is below `2^256`, so the root always fits in `u128`.
#[must_use]
pub fn sqrt_product(a: Amount, b: Amount) -> Amount {
    let root = (wide(a) * wide(b)).sqrt();
    // √(2^256 − 1) < 2^128
    Amount::new(root.to_u128().unwrap_or(u128::MAX))
}

/// `2^256`, the modulus of the cumulative price accumulators.
fn u256_modulus() -> BigUint {
    BigUint::one() << 256u32
}

/// UQ112x112 encoding of `numerator / denominator`: `numerator × 2^112 /
/// denominator`, floored.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is zero.
pub fn uq112x112_ratio(numerator: Amount, denominator: Amount) -> Result<BigUint, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    Ok((wide(numerator) << 112u32) / wide(denominator))
}

/// Adds `price × elapsed` to an accumulator, wrapping modulo `2^256`.
#[must_use]
pub fn accumulate_price(accumulator: &BigUint, price: &BigUint, elapsed: u64) -> BigUint {
    (accumulator + price * BigUint::from(elapsed)) % u256_modulus()
}
