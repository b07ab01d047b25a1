//! Routing and safety layer.
//!
//! The [`Router`] never holds balances between calls.  Every entry point
//! checks its deadline, sizes the trade with the math library, moves the
//! caller's tokens straight into the pairs and enforces the caller's
//! slippage bounds.  Native currency is wrapped on the way in and
//! unwrapped on the way out, using the router's own address as a
//! transient custody account.
//!
//! Each entry point is one unit of work: if any step fails, the ledger,
//! every pair it touched and the factory's registry are put back exactly
//! as they were.
//!
//! | Area | Operations |
//! |------|------------|
//! | liquidity | `add_liquidity`, `add_liquidity_eth`, `remove_liquidity`, `remove_liquidity_eth` |
//! | swaps | `swap_exact_tokens_for_tokens`, `swap_tokens_for_exact_tokens` and the four native variants |
//! | pricing | `quote`, `get_amount_out`, `get_amount_in`, `get_amounts_out`, `get_amounts_in` |

mod exchange_router;
mod liquidity;
mod swap;
mod unit_of_work;

pub use exchange_router::Router;
