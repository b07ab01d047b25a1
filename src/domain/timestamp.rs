//! Block time in whole seconds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Seconds since an arbitrary epoch, as seen by the ledger's clock.
///
/// Deadlines and the price accumulators are both measured in this unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Raw seconds.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`, zero if the clock went backwards.
    #[must_use]
    pub const fn seconds_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// This timestamp moved forward by `seconds`.
    #[must_use]
    pub const fn plus(&self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
