//! Records emitted for observability and indexing.
//!
//! Events are appended to the [`Ledger`](crate::ledger::Ledger) log as
//! operations commit; a rolled-back operation leaves no events behind.
//! Nothing inside the engine reads them back.

use serde::{Deserialize, Serialize};

use super::{Address, Amount};

/// One emitted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// A pair was registered by the factory.
    PairCreated {
        /// Lower token address.
        token0: Address,
        /// Higher token address.
        token1: Address,
        /// Deterministic pair address.
        pair: Address,
        /// Number of pairs after this one was added.
        pair_count: usize,
    },
    /// Liquidity was added to a pair.
    Mint {
        /// Pair that minted shares.
        pair: Address,
        /// Account that invoked `mint`.
        sender: Address,
        /// Token0 deposited.
        amount0: Amount,
        /// Token1 deposited.
        amount1: Amount,
    },
    /// Liquidity was removed from a pair.
    Burn {
        /// Pair that burned shares.
        pair: Address,
        /// Account that invoked `burn`.
        sender: Address,
        /// Token0 paid out.
        amount0: Amount,
        /// Token1 paid out.
        amount1: Amount,
        /// Recipient of both tokens.
        to: Address,
    },
    /// A swap settled.
    Swap {
        /// Pair that executed the swap.
        pair: Address,
        /// Account that invoked `swap`.
        sender: Address,
        /// Token0 received by the pair.
        amount0_in: Amount,
        /// Token1 received by the pair.
        amount1_in: Amount,
        /// Token0 sent out.
        amount0_out: Amount,
        /// Token1 sent out.
        amount1_out: Amount,
        /// Output recipient.
        to: Address,
    },
    /// Pair reserves were written.
    Sync {
        /// Pair whose reserves changed.
        pair: Address,
        /// New reserve of token0.
        reserve0: Amount,
        /// New reserve of token1.
        reserve1: Amount,
    },
    /// Token or LP-share balance moved.  Mints come from and burns go to
    /// the zero address.
    Transfer {
        /// Token (or pair, for LP shares) whose balances moved.
        token: Address,
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        amount: Amount,
    },
    /// An allowance was set.
    Approval {
        /// Token (or pair, for LP shares).
        token: Address,
        /// Account granting the allowance.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// New allowance.
        amount: Amount,
    },
    /// Native currency was wrapped.
    Deposit {
        /// Wrapped-native token.
        token: Address,
        /// Account credited with wrapped tokens.
        account: Address,
        /// Amount wrapped.
        amount: Amount,
    },
    /// Wrapped tokens were redeemed for native currency.
    Withdrawal {
        /// Wrapped-native token.
        token: Address,
        /// Account credited with native currency.
        account: Address,
        /// Amount unwrapped.
        amount: Amount,
    },
}

impl Event {
    /// Short name of the record, used in log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PairCreated { .. } => "PairCreated",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::Swap { .. } => "Swap",
            Self::Sync { .. } => "Sync",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::Deposit { .. } => "Deposit",
            Self::Withdrawal { .. } => "Withdrawal",
        }
    }
}
