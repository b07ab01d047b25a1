//! In-memory token implementations.
//!
//! | Type | Role |
//! |------|------|
//! | [`ShareLedger`] | balances, allowances and supply of one token |
//! | [`StandardToken`] | ERC-20 style token; also backs LP shares |
//! | [`WrappedNativeToken`] | 1:1 wrapper around the ledger's native currency |
//! | [`TokenBox`] | enum dispatch over the above, stored by the ledger |

mod share_ledger;
mod standard;
mod token_box;
mod wrapped_native;

pub use share_ledger::ShareLedger;
pub use standard::StandardToken;
pub use token_box::TokenBox;
pub use wrapped_native::WrappedNativeToken;
