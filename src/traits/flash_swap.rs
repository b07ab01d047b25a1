//! Flash-swap callback.

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::ledger::Ledger;

/// Receiver of a flash swap.
///
/// [`Pair::swap`](crate::pair::Pair::swap) transfers the requested outputs
/// first, then calls [`on_flash_swap`](Self::on_flash_swap), and only
/// afterwards checks that enough input (or repayment) arrived to keep the
/// fee-adjusted invariant.  The callee may do anything with the ledger in
/// between, including trading on other pairs.  Re-entering the pair that
/// is calling back fails with [`AmmError::Locked`].
///
/// Returning an error aborts the whole swap.
pub trait FlashSwapCallee {
    /// Called once per swap, after the outputs were transferred.
    ///
    /// # Errors
    ///
    /// Any error aborts and rolls back the swap.
    fn on_flash_swap(
        &mut self,
        ledger: &mut Ledger,
        sender: Address,
        amount0: Amount,
        amount1: Amount,
        data: &[u8],
    ) -> Result<(), AmmError>;
}
