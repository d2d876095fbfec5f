use crate::common::{Cell, Direction};
use crate::domains::ledger::StructureKind;
use serde::{Deserialize, Serialize};

/// One cell as seen by an agent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensedCell {
    pub cell: Cell,
    /// Something (agent, structure, wall) stands on the cell.
    pub occupied: bool,
    /// The cell is impassable because of the hazard field right now.
    pub hazardous: bool,
    pub elevation: i32,
}

impl SensedCell {
    pub fn is_traversable(&self) -> bool {
        !self.occupied && !self.hazardous
    }
}

/// A structure within sensor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensedStructure {
    pub cell: Cell,
    pub kind: StructureKind,
    /// Belongs to the sensing agent's team.
    pub friendly: bool,
}

/// Port through which the navigator observes the world around one agent.
pub trait SensingAdapter {
    fn position(&self) -> Cell;
    fn current_tick(&self) -> u32;
    /// Every cell within the agent's sensor radius, excluding its own cell.
    fn sense_cells(&self) -> Vec<SensedCell>;
    /// In bounds and unoccupied.
    fn can_occupy(&self, cell: Cell) -> bool;
    fn is_hazardous(&self, cell: Cell) -> bool;
    /// Structures within sensor range. Bodies that cannot tell report none.
    fn sense_structures(&self) -> Vec<SensedStructure> {
        Vec::new()
    }
}

/// Port through which the navigator acts on behalf of one agent.
pub trait ActuationAdapter {
    fn is_action_ready(&self) -> bool;
    /// Returns false if the move is illegal or the agent is on cooldown.
    fn attempt_move(&mut self, direction: Direction) -> bool;
    /// Hand control back to the scheduler until the next tick.
    fn yield_turn(&mut self);
}

/// The full capability set the navigator needs from an agent's body.
pub trait AgentBody: SensingAdapter + ActuationAdapter {}

impl<T: SensingAdapter + ActuationAdapter + ?Sized> AgentBody for T {}
