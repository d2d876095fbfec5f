use crate::common::Cell;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

/// Per-agent facts about the match that the core needs on every call. Passed
/// explicitly instead of living in shared mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub id: u32,
    pub team: Team,
    pub spawn_round: u32,
    pub spawn_cell: Cell,
    round: u32,
}

impl AgentContext {
    pub fn new(id: u32, team: Team, spawn_round: u32, spawn_cell: Cell) -> Self {
        Self {
            id,
            team,
            spawn_round,
            spawn_cell,
            round: spawn_round,
        }
    }

    pub fn begin_turn(&mut self, round: u32) {
        self.round = round;
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// 1 on the spawn round, counting up from there.
    pub fn turn_count(&self) -> u32 {
        self.round.saturating_sub(self.spawn_round) + 1
    }
}
