//! Unified error types for the exchange engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every error aborts the requested operation as a whole: the
//! caller observes no partial reserve, balance, or share mutation.
//!
//! The variants group into:
//!
//! - pair creation: [`IdenticalAddresses`](AmmError::IdenticalAddresses),
//!   [`ZeroAddress`](AmmError::ZeroAddress), [`PairExists`](AmmError::PairExists)
//! - share accounting: [`InsufficientLiquidityMinted`](AmmError::InsufficientLiquidityMinted),
//!   [`InsufficientLiquidityBurned`](AmmError::InsufficientLiquidityBurned)
//! - swap validity: [`InsufficientInputAmount`](AmmError::InsufficientInputAmount),
//!   [`InsufficientOutputAmount`](AmmError::InsufficientOutputAmount), [`K`](AmmError::K)
//! - router safety: [`InsufficientAAmount`](AmmError::InsufficientAAmount),
//!   [`InsufficientBAmount`](AmmError::InsufficientBAmount),
//!   [`ExcessiveInputAmount`](AmmError::ExcessiveInputAmount),
//!   [`Expired`](AmmError::Expired), [`InvalidPath`](AmmError::InvalidPath)
//! - arithmetic: [`Overflow`](AmmError::Overflow), [`Underflow`](AmmError::Underflow),
//!   [`DivisionByZero`](AmmError::DivisionByZero)

use thiserror::Error;

/// Errors raised by the factory, pairs, router, math library and token
/// adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Both sides of a pair refer to the same token.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// A token address is the zero sentinel.
    #[error("zero address")]
    ZeroAddress,

    /// The token pair is already registered.
    #[error("pair exists")]
    PairExists,

    /// No pair is registered for the requested tokens.
    #[error("pair not found")]
    PairNotFound,

    /// A deposit would mint zero LP shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would return zero of either token.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// A swap received no input on either side.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// A swap requested no output, or produced less than the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Reserves cannot cover the request, or a reserve is zero.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A quote was requested for a zero amount.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// The matched amount of token A fell below the caller's minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// The matched amount of token B fell below the caller's minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// An exact-output trade needs more input than the caller allowed.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// Swap output recipient is one of the pair's own tokens.
    #[error("invalid to")]
    InvalidTo,

    /// The constant-product invariant would decrease.
    #[error("K")]
    K,

    /// The operation's deadline has passed.
    #[error("expired")]
    Expired,

    /// The route is shorter than two tokens or its native endpoint is wrong.
    #[error("invalid path")]
    InvalidPath,

    /// The pair is already executing a mutating operation.
    #[error("locked")]
    Locked,

    /// The caller lacks the admin rights for this operation.
    #[error("forbidden")]
    Forbidden,

    /// The underlying token adapter refused a transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(&'static str),

    /// No token adapter is registered at the address.
    #[error("unknown token")]
    UnknownToken,

    /// An arithmetic operation overflowed.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// An arithmetic operation underflowed.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Exchange configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Fee parameter is out of range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;
