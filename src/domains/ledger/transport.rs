use super::category::Category;
use super::codec::{decode, encode, Fact, DEFAULT_SALT_BOUND};
use super::ports::LedgerChannel;
use crate::common::Cell;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A fact that could not be submitted yet. At most one exists per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub category: Category,
    pub location: Cell,
    pub bid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Salts are drawn from `0..salt_bound`.
    pub salt_bound: i32,
    /// How many past rounds a history scan covers.
    pub history_window: u32,
    pub default_bid: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            salt_bound: DEFAULT_SALT_BOUND,
            history_window: 100,
            default_bid: 1,
        }
    }
}

/// Publishes facts to the ledger with a single last-writer-wins retry slot, and reads
/// them back from past rounds.
#[derive(Debug, Clone, Default)]
pub struct LedgerTransport {
    settings: TransportSettings,
    pending: Option<PendingTransaction>,
}

impl LedgerTransport {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings, pending: None }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Submits a fact to the current round. A refused submission becomes the pending
    /// transaction, replacing whatever was pending before.
    pub fn publish<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        category: Category,
        location: Cell,
        bid: u32,
    ) -> bool
    where
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        if self.submit(channel, rng, category, location, bid) {
            return true;
        }
        if let Some(previous) = self.pending.replace(PendingTransaction { category, location, bid }) {
            debug!(?previous, "pending transaction overwritten");
        }
        debug!(?category, %location, round = channel.current_round(), "ledger refused submission, pending");
        false
    }

    /// Retries the pending transaction, re-encoded for the current round. True when it
    /// was delivered; false when there was nothing to send or it was refused again, in
    /// which case it stays pending unchanged.
    pub fn flush_pending<C, R>(&mut self, channel: &mut C, rng: &mut R) -> bool
    where
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(pending) = self.pending else {
            return false;
        };
        if self.submit(channel, rng, pending.category, pending.location, pending.bid) {
            self.pending = None;
            debug!(category = ?pending.category, "pending transaction delivered");
            true
        } else {
            trace!(category = ?pending.category, "pending transaction refused again");
            false
        }
    }

    fn submit<C, R>(&self, channel: &mut C, rng: &mut R, category: Category, location: Cell, bid: u32) -> bool
    where
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        let round = channel.current_round();
        let message = encode(category, location, round as i32, self.settings.salt_bound, rng);
        let accepted = channel.submit(round, message, bid);
        if accepted {
            trace!(?category, %location, round, bid, "fact submitted");
        }
        accepted
    }

    /// Valid facts from one finished round. Invalid entries are dropped silently.
    pub fn facts_in_round<C: LedgerChannel + ?Sized>(&self, channel: &C, round: u32) -> Vec<Fact> {
        if round >= channel.current_round() {
            return Vec::new();
        }
        channel
            .read(round)
            .iter()
            .filter_map(|raw| match decode(raw) {
                Ok(fact) => Some(fact),
                Err(reason) => {
                    trace!(round, %reason, "dropping ledger entry");
                    None
                }
            })
            .collect()
    }

    /// Valid facts from `since` up to the previous round, oldest first, bounded to the
    /// last `history_window` rounds.
    pub fn decoded_facts_since<C: LedgerChannel + ?Sized>(&self, channel: &C, since: u32) -> Vec<Fact> {
        let current = channel.current_round();
        let start = since.max(current.saturating_sub(self.settings.history_window));
        (start..current)
            .flat_map(|round| self.facts_in_round(channel, round))
            .collect()
    }

    /// First fact of `category` in `round`.
    pub fn find_in_round<C: LedgerChannel + ?Sized>(
        &self,
        channel: &C,
        round: u32,
        category: Category,
    ) -> Option<Fact> {
        self.facts_in_round(channel, round)
            .into_iter()
            .find(|fact| fact.category == category)
    }
}
