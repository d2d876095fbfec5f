use super::codec::RawMessage;

/// The shared, per-round, capacity-bounded ledger. Both teams read it.
///
/// Implementations must only expose a round's block once that round is over: a
/// message submitted in round N becomes readable from round N + 1.
pub trait LedgerChannel {
    fn current_round(&self) -> u32;
    /// Offers `message` for inclusion in `round`'s block. False when the block is full
    /// or the bid is refused.
    fn submit(&mut self, round: u32, message: RawMessage, bid: u32) -> bool;
    fn read(&self, round: u32) -> Vec<RawMessage>;
}
