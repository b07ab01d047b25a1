//! Value types shared by the factory, pairs, router and math library.
//!
//! All types are small `Copy`/`Clone` newtypes with validated
//! constructors where an invariant exists (a [`TokenPair`] is always
//! sorted and distinct, a [`Path`] always has at least one hop).

mod address;
mod amount;
mod basis_points;
mod event;
mod fee_tier;
mod path;
mod timestamp;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use event::Event;
pub use fee_tier::FeeTier;
pub use path::Path;
pub use timestamp::Timestamp;
pub use token_pair::TokenPair;
