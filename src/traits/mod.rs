//! Trait seams between the exchange and its collaborators.
//!
//! [`TokenAdapter`] and [`WrappedNativeAdapter`] describe the tokens the
//! exchange moves; [`FlashSwapCallee`] describes code that borrows pair
//! outputs before paying for them.

mod flash_swap;
mod token_adapter;

pub use flash_swap::FlashSwapCallee;
pub use token_adapter::{TokenAdapter, WrappedNativeAdapter};
