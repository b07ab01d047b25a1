//! Arithmetic for reserve and share calculations.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe
//! operations, [`Rounding`] for explicit division rounding, 256-bit
//! intermediates for products of two amounts, and the pricing library
//! ([`quote`], [`get_amount_out`], [`get_amount_in`] and their multi-hop
//! forms).
//!
//! Nothing here holds state; the pair and the router call into it.

mod checked;
mod library;
mod rounding;
mod wide;

pub use checked::CheckedArithmetic;
pub use library::{get_amount_in, get_amount_out, get_amounts_in, get_amounts_out, quote};
pub use rounding::Rounding;
pub use wide::{accumulate_price, mul_div, narrow, sqrt_product, uq112x112_ratio, wide};
