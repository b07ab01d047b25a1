//! Router entry points as ledger units of work.
//!
//! Pairs and the factory journal their own writes in the ledger, so a
//! router call only has to run inside [`Ledger::atomic`] to roll back as
//! a whole.  [`UnitOfWork`] is the factory view the call works through.

use std::sync::Arc;

use crate::domain::Address;
use crate::error::AmmError;
use crate::factory::Factory;
use crate::ledger::Ledger;
use crate::pair::Pair;

pub(crate) struct UnitOfWork<'f> {
    factory: &'f Factory,
}

impl UnitOfWork<'_> {
    /// The existing pair for two tokens.
    pub(crate) fn pair(&self, token_a: Address, token_b: Address) -> Result<Arc<Pair>, AmmError> {
        self.factory
            .pair_by_tokens(token_a, token_b)
            .ok_or(AmmError::PairNotFound)
    }

    /// The pair for two tokens, created first if it does not exist yet.
    pub(crate) fn pair_or_create(
        &self,
        ledger: &mut Ledger,
        token_a: Address,
        token_b: Address,
    ) -> Result<Arc<Pair>, AmmError> {
        match self.factory.pair_by_tokens(token_a, token_b) {
            Some(pair) => Ok(pair),
            None => self.factory.create_pair(ledger, token_a, token_b),
        }
    }
}

/// Runs `op` as one router unit of work.
pub(crate) fn execute<T, F>(
    factory: &Factory,
    ledger: &mut Ledger,
    operation: &'static str,
    op: F,
) -> Result<T, AmmError>
where
    F: FnOnce(&UnitOfWork<'_>, &mut Ledger) -> Result<T, AmmError>,
{
    let work = UnitOfWork { factory };
    let result = ledger.atomic(|ledger| op(&work, ledger));
    if let Err(err) = &result {
        tracing::warn!("{} rolled back: {}", operation, err);
    }
    result
}
