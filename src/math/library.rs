//! Pure pricing functions shared by the pair and the router.
//!
//! All functions take raw [`Amount`]s and a [`FeeTier`]; none of them
//! touch state.  Multi-hop helpers receive a reserves lookup so they can
//! be driven by the factory or by a test fixture alike.
//!
//! # Formulas (`m = 10 000 − fee_bps`)
//!
//! | Function | Result |
//! |----------|--------|
//! | [`quote`] | `a × r_b / r_a` |
//! | [`get_amount_out`] | `in × m × r_out / (r_in × 10 000 + in × m)` |
//! | [`get_amount_in`] | `r_in × out × 10 000 / ((r_out − out) × m) + 1` |
//!
//! Outputs are floored and required inputs carry the `+ 1`, so rounding
//! always favours the pool.

use num_bigint::BigUint;

use super::wide::{mul_div, narrow, wide};
use super::Rounding;
use crate::domain::{Address, Amount, FeeTier, Path};
use crate::error::AmmError;

/// Equivalent amount of token B for `amount_a` of token A at the current
/// reserve ratio, with no fee.  Used to size balanced deposits.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Amount;
/// use pairswap::math::quote;
///
/// let b = quote(Amount::new(10), Amount::new(100), Amount::new(400)).expect("quotable");
/// assert_eq!(b, Amount::new(40));
/// ```
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    mul_div(amount_a, reserve_b, reserve_a, Rounding::Down)
}

/// Maximum output for an exact input, after the fee.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Amount, FeeTier};
/// use pairswap::math::get_amount_out;
///
/// let out = get_amount_out(
///     Amount::new(100),
///     Amount::new(1_000),
///     Amount::new(1_000),
///     FeeTier::default(),
/// )
/// .expect("liquid pool");
/// assert_eq!(out, Amount::new(90));
/// ```
pub fn get_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let in_with_fee = wide(amount_in) * BigUint::from(fee.input_multiplier());
    let numerator = &in_with_fee * wide(reserve_out);
    let denominator = wide(reserve_in) * BigUint::from(FeeTier::DENOMINATOR) + in_with_fee;
    // denominator ≥ reserve_in × 10 000 > 0
    narrow(&(numerator / denominator), "amount out exceeds u128")
}

/// Minimum input required to receive exactly `amount_out`, after the fee.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out` would drain the output reserve.
/// - [`AmmError::InvalidFee`] if the fee tier leaves no input weight.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Amount, FeeTier};
/// use pairswap::math::get_amount_in;
///
/// let needed = get_amount_in(
///     Amount::new(90),
///     Amount::new(1_000),
///     Amount::new(1_000),
///     FeeTier::default(),
/// )
/// .expect("liquid pool");
/// assert_eq!(needed, Amount::new(100));
/// ```
pub fn get_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let multiplier = fee.input_multiplier();
    if multiplier == 0 {
        return Err(AmmError::InvalidFee("fee consumes the entire input"));
    }
    let numerator =
        wide(reserve_in) * wide(amount_out) * BigUint::from(FeeTier::DENOMINATOR);
    let remaining = reserve_out.saturating_sub(&amount_out);
    let denominator = wide(remaining) * BigUint::from(multiplier);
    let amount_in = numerator / denominator + 1u32;
    narrow(&amount_in, "amount in exceeds u128")
}

/// Chains [`get_amount_out`] along `path`.
///
/// `reserves(token_in, token_out)` must return the reserves of the pair
/// for that hop oriented as `(reserve_in, reserve_out)`.  The result has
/// one entry per token: `amounts[0] == amount_in` and the last entry is
/// the final output.
///
/// # Errors
///
/// Propagates the first error from `reserves` or [`get_amount_out`].
pub fn get_amounts_out<F>(
    amount_in: Amount,
    path: &Path,
    fee: FeeTier,
    mut reserves: F,
) -> Result<Vec<Amount>, AmmError>
where
    F: FnMut(Address, Address) -> Result<(Amount, Amount), AmmError>,
{
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    let mut current = amount_in;
    for (token_in, token_out) in path.hops() {
        let (reserve_in, reserve_out) = reserves(token_in, token_out)?;
        current = get_amount_out(current, reserve_in, reserve_out, fee)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Chains [`get_amount_in`] backwards along `path`.
///
/// The result is in path order: `amounts[0]` is the input required and
/// the last entry equals `amount_out`.
///
/// # Errors
///
/// Propagates the first error from `reserves` or [`get_amount_in`].
pub fn get_amounts_in<F>(
    amount_out: Amount,
    path: &Path,
    fee: FeeTier,
    mut reserves: F,
) -> Result<Vec<Amount>, AmmError>
where
    F: FnMut(Address, Address) -> Result<(Amount, Amount), AmmError>,
{
    let mut amounts = vec![Amount::ZERO; path.len()];
    let last = amounts.len() - 1;
    amounts[last] = amount_out;
    let mut current = amount_out;
    for (index, (token_in, token_out)) in path.hops().enumerate().rev() {
        let (reserve_in, reserve_out) = reserves(token_in, token_out)?;
        current = get_amount_in(current, reserve_in, reserve_out, fee)?;
        amounts[index] = current;
    }
    Ok(amounts)
}
