//! Protocol fee switch shared by the factory and its pairs.

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// Who receives the protocol fee, and who may change that.
///
/// The factory owns the only writer; every pair holds a read handle so a
/// change applies to the next mint or burn of every pair at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSettings {
    /// Recipient of protocol fee shares; `None` switches the fee off.
    pub fee_to: Option<Address>,
    /// Admin allowed to change both fields.
    pub fee_to_setter: Address,
}

impl FeeSettings {
    /// Fee switched off, administered by `fee_to_setter`.
    #[must_use]
    pub const fn new(fee_to_setter: Address) -> Self {
        Self {
            fee_to: None,
            fee_to_setter,
        }
    }

    /// Returns `true` while a fee recipient is set.
    #[must_use]
    pub const fn is_fee_on(&self) -> bool {
        self.fee_to.is_some()
    }
}
