use crate::domains::ledger::{LedgerChannel, RawMessage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub message: RawMessage,
    pub bid: u32,
}

/// Single-process ledger: one block per round, bounded capacity, a minimum bid, and
/// blocks readable only once their round is over.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    capacity: usize,
    minimum_bid: u32,
    round: u32,
    blocks: BTreeMap<u32, Vec<LedgerEntry>>,
}

impl InMemoryLedger {
    /// Starts at round 1.
    pub fn new(capacity: usize, minimum_bid: u32) -> Self {
        Self {
            capacity,
            minimum_bid,
            round: 1,
            blocks: BTreeMap::new(),
        }
    }

    /// Closes the current block and opens the next round.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    pub fn block(&self, round: u32) -> &[LedgerEntry] {
        self.blocks.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.block(self.round).len())
    }

    pub fn total_entries(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }
}

impl LedgerChannel for InMemoryLedger {
    fn current_round(&self) -> u32 {
        self.round
    }

    fn submit(&mut self, round: u32, message: RawMessage, bid: u32) -> bool {
        if round != self.round || bid < self.minimum_bid {
            return false;
        }
        let block = self.blocks.entry(round).or_default();
        if block.len() >= self.capacity {
            return false;
        }
        block.push(LedgerEntry { message, bid });
        true
    }

    fn read(&self, round: u32) -> Vec<RawMessage> {
        if round >= self.round {
            return Vec::new();
        }
        self.block(round).iter().map(|entry| entry.message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: RawMessage = [1, 2, 3, 4, 5, 6, 3];

    #[test]
    fn block_becomes_visible_next_round() {
        let mut ledger = InMemoryLedger::new(7, 1);
        assert!(ledger.submit(1, MESSAGE, 1));
        assert!(ledger.read(1).is_empty());
        ledger.advance_round();
        assert_eq!(ledger.read(1), vec![MESSAGE]);
    }

    #[test]
    fn full_block_and_low_bids_are_refused() {
        let mut ledger = InMemoryLedger::new(1, 2);
        assert!(!ledger.submit(1, MESSAGE, 1));
        assert!(ledger.submit(1, MESSAGE, 2));
        assert!(!ledger.submit(1, MESSAGE, 5));
        assert_eq!(ledger.remaining_capacity(), 0);
    }

    #[test]
    fn only_the_open_round_accepts_writes() {
        let mut ledger = InMemoryLedger::new(7, 0);
        ledger.advance_round();
        assert!(!ledger.submit(1, MESSAGE, 1));
        assert!(!ledger.submit(3, MESSAGE, 1));
        assert!(ledger.submit(2, MESSAGE, 1));
        assert_eq!(ledger.total_entries(), 1);
    }
}
