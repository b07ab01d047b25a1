//! Undo journal backing [`Ledger::atomic`](super::Ledger::atomic).
//!
//! Each open unit of work pushes a [`Frame`].  The first time a balance,
//! allowance, supply, native balance or pair state is touched inside a
//! frame, its previous value is saved there; later touches in the same
//! frame save nothing.  Committing an inner frame folds its saved values
//! into the parent, keeping the parent's own (older) values where both
//! exist, so rolling back the parent still restores the state from before
//! the parent began.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{Address, Amount, Timestamp, TokenPair};
use crate::factory::PairRegistry;
use crate::pair::PairState;

/// One journaled amount inside a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    /// `total_supply` of a token.
    Supply(Address),
    /// `(token, owner)` balance.
    Balance(Address, Address),
    /// `(token, owner, spender)` allowance.
    Allowance(Address, Address, Address),
}

impl Slot {
    pub(crate) const fn token(&self) -> Address {
        match *self {
            Self::Supply(token) | Self::Balance(token, _) | Self::Allowance(token, _, _) => token,
        }
    }
}

/// A pair's state as it was before the frame first wrote it.
#[derive(Debug)]
pub(crate) struct SavedPair {
    cell: Arc<RwLock<PairState>>,
    state: PairState,
}

impl SavedPair {
    pub(crate) fn restore(self) {
        *self.cell.write() = self.state;
    }
}

/// A pair registered with a factory inside the frame.
#[derive(Debug)]
pub(crate) struct CreatedPair {
    registry: PairRegistry,
    tokens: TokenPair,
}

impl CreatedPair {
    pub(crate) fn forget(&self) {
        self.registry.forget(&self.tokens);
    }
}

/// Saved state for one open unit of work.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    pub(crate) slots: HashMap<Slot, Amount>,
    /// Tokens registered inside the frame, oldest first.
    pub(crate) registered: Vec<Address>,
    pub(crate) native: HashMap<Address, Amount>,
    pub(crate) pairs: HashMap<Address, SavedPair>,
    /// Pairs created inside the frame, oldest first.
    pub(crate) created: Vec<CreatedPair>,
    pub(crate) events_len: usize,
    pub(crate) now: Timestamp,
}

/// Stack of open frames.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    frames: Vec<Frame>,
}

impl Journal {
    pub(crate) fn begin(&mut self, events_len: usize, now: Timestamp) {
        self.frames.push(Frame {
            events_len,
            now,
            ..Frame::default()
        });
    }

    /// Saves a slot's previous value unless the top frame already has it.
    pub(crate) fn record_slot(&mut self, slot: Slot, previous: Amount) {
        if let Some(frame) = self.frames.last_mut() {
            frame.slots.entry(slot).or_insert(previous);
        }
    }

    pub(crate) fn record_registered(&mut self, token: Address) {
        if let Some(frame) = self.frames.last_mut() {
            frame.registered.push(token);
        }
    }

    pub(crate) fn record_native(&mut self, account: Address, previous: Amount) {
        if let Some(frame) = self.frames.last_mut() {
            frame.native.entry(account).or_insert(previous);
        }
    }

    /// Saves the current content of `cell` unless the top frame already
    /// holds the pair at `address`.
    pub(crate) fn record_pair(&mut self, address: Address, cell: &Arc<RwLock<PairState>>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pairs.entry(address).or_insert_with(|| SavedPair {
                cell: Arc::clone(cell),
                state: cell.read().clone(),
            });
        }
    }

    pub(crate) fn record_created(&mut self, registry: PairRegistry, tokens: TokenPair) {
        if let Some(frame) = self.frames.last_mut() {
            frame.created.push(CreatedPair { registry, tokens });
        }
    }

    /// Closes the top frame, keeping its changes.
    pub(crate) fn commit(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if let Some(parent) = self.frames.last_mut() {
            for (slot, saved) in frame.slots {
                parent.slots.entry(slot).or_insert(saved);
            }
            parent.registered.extend(frame.registered);
            for (account, saved) in frame.native {
                parent.native.entry(account).or_insert(saved);
            }
            for (address, saved) in frame.pairs {
                parent.pairs.entry(address).or_insert(saved);
            }
            parent.created.extend(frame.created);
        }
    }

    /// Closes the top frame and hands back what must be restored.
    pub(crate) fn rollback(&mut self) -> Option<Frame> {
        self.frames.pop()
    }
}
