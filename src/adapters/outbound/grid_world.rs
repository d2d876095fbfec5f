//! In-process grid used by the simulation driver and the scenario tests. Implements
//! the sensing and actuation ports for one agent at a time.

use crate::common::{Cell, Direction, DomainError, DomainResult};
use crate::domains::agent::Team;
use crate::domains::hazard::HazardModel;
use crate::domains::ledger::StructureKind;
use crate::domains::navigation::{ActuationAdapter, SensedCell, SensedStructure, SensingAdapter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Inclusive rectangle of playable cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: Cell,
    pub max: Cell,
}

impl GridBounds {
    pub fn contains(&self, cell: Cell) -> bool {
        (self.min.x..=self.max.x).contains(&cell.x) && (self.min.y..=self.max.y).contains(&cell.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Structure {
    kind: StructureKind,
    team: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occupant {
    position: Cell,
    team: Team,
    cooldown: u32,
}

#[derive(Debug, Clone)]
pub struct GridWorld {
    bounds: Option<GridBounds>,
    walls: HashSet<Cell>,
    elevations: HashMap<Cell, i32>,
    default_elevation: i32,
    structures: HashMap<Cell, Structure>,
    agents: BTreeMap<u32, Occupant>,
    hazard: HazardModel,
    sensor_radius_squared: i64,
    move_cooldown: u32,
    tick: u32,
}

impl GridWorld {
    pub fn new(hazard: HazardModel, sensor_radius_squared: i64) -> Self {
        Self {
            bounds: None,
            walls: HashSet::new(),
            elevations: HashMap::new(),
            default_elevation: 0,
            structures: HashMap::new(),
            agents: BTreeMap::new(),
            hazard,
            sensor_radius_squared,
            move_cooldown: 1,
            tick: 1,
        }
    }

    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_default_elevation(mut self, elevation: i32) -> Self {
        self.default_elevation = elevation;
        self
    }

    /// Ticks of cooldown after each move; 1 allows one move per tick.
    pub fn with_move_cooldown(mut self, cooldown: u32) -> Self {
        self.move_cooldown = cooldown.max(1);
        self
    }

    pub fn add_wall(&mut self, cell: Cell) {
        self.walls.insert(cell);
    }

    pub fn add_walls<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        self.walls.extend(cells);
    }

    pub fn set_elevation(&mut self, cell: Cell, elevation: i32) {
        self.elevations.insert(cell, elevation);
    }

    pub fn add_structure(&mut self, cell: Cell, kind: StructureKind, team: Team) {
        self.structures.insert(cell, Structure { kind, team });
    }

    pub fn spawn_agent(&mut self, id: u32, cell: Cell, team: Team) -> DomainResult<()> {
        if self.agents.contains_key(&id) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} already spawned", id),
            });
        }
        if self.is_blocked(cell) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Cannot spawn agent {} on blocked cell {}", id, cell),
            });
        }
        self.agents.insert(id, Occupant { position: cell, team, cooldown: 0 });
        Ok(())
    }

    pub fn position_of(&self, id: u32) -> Option<Cell> {
        self.agents.get(&id).map(|agent| agent.position)
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn hazard(&self) -> &HazardModel {
        &self.hazard
    }

    pub fn elevation(&self, cell: Cell) -> i32 {
        self.elevations.get(&cell).copied().unwrap_or(self.default_elevation)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.bounds.map_or(true, |bounds| bounds.contains(cell))
    }

    /// Out of bounds, a wall, a structure or another agent.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell)
            || self.walls.contains(&cell)
            || self.structures.contains_key(&cell)
            || self.agents.values().any(|agent| agent.position == cell)
    }

    pub fn is_flooded(&self, cell: Cell) -> bool {
        self.hazard.is_hazardous(self.tick, self.elevation(cell))
    }

    /// Closes the tick: cooldowns run down and the hazard clock advances.
    pub fn end_tick(&mut self) {
        for agent in self.agents.values_mut() {
            agent.cooldown = agent.cooldown.saturating_sub(1);
        }
        self.tick += 1;
    }

    /// The body of agent `id` for the duration of its turn.
    pub fn body(&mut self, id: u32) -> DomainResult<AgentView<'_>> {
        if !self.agents.contains_key(&id) {
            return Err(DomainError::UnknownAgent { id });
        }
        Ok(AgentView { world: self, id, yielded: false })
    }

    fn occupant(&self, id: u32) -> Occupant {
        self.agents[&id]
    }
}

/// One agent's view of and handle on the world. Yielding ends the turn: the agent
/// cannot act again until the next tick.
pub struct AgentView<'a> {
    world: &'a mut GridWorld,
    id: u32,
    yielded: bool,
}

impl AgentView<'_> {
    fn sensed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let here = self.position();
        let radius = (self.world.sensor_radius_squared.max(0) as f64).sqrt() as i32;
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| Cell::new(here.x + dx, here.y + dy)))
            .filter(move |cell| {
                *cell != here
                    && here.distance_squared_to(*cell) <= self.world.sensor_radius_squared
                    && self.world.in_bounds(*cell)
            })
    }
}

impl SensingAdapter for AgentView<'_> {
    fn position(&self) -> Cell {
        self.world.occupant(self.id).position
    }

    fn current_tick(&self) -> u32 {
        self.world.tick
    }

    fn sense_cells(&self) -> Vec<SensedCell> {
        self.sensed_cells()
            .map(|cell| SensedCell {
                cell,
                occupied: self.world.is_blocked(cell),
                hazardous: self.world.is_flooded(cell),
                elevation: self.world.elevation(cell),
            })
            .collect()
    }

    fn can_occupy(&self, cell: Cell) -> bool {
        !self.world.is_blocked(cell)
    }

    fn is_hazardous(&self, cell: Cell) -> bool {
        self.world.is_flooded(cell)
    }

    fn sense_structures(&self) -> Vec<SensedStructure> {
        let team = self.world.occupant(self.id).team;
        self.sensed_cells()
            .filter_map(|cell| {
                self.world.structures.get(&cell).map(|structure| SensedStructure {
                    cell,
                    kind: structure.kind,
                    friendly: structure.team == team,
                })
            })
            .collect()
    }
}

impl ActuationAdapter for AgentView<'_> {
    fn is_action_ready(&self) -> bool {
        !self.yielded && self.world.occupant(self.id).cooldown == 0
    }

    fn attempt_move(&mut self, direction: Direction) -> bool {
        if direction == Direction::Center || !self.is_action_ready() {
            return false;
        }
        let target = self.position().add(direction);
        if self.world.is_blocked(target) || self.world.is_flooded(target) {
            return false;
        }
        let cooldown = self.world.move_cooldown;
        if let Some(agent) = self.world.agents.get_mut(&self.id) {
            agent.position = target;
            agent.cooldown = cooldown;
        }
        true
    }

    fn yield_turn(&mut self) {
        self.yielded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::hazard::HazardCurve;

    fn dry_world() -> GridWorld {
        GridWorld::new(HazardModel::new(HazardCurve::Constant { level: 0 }, 0), 8)
    }

    #[test]
    fn one_move_per_tick() {
        let mut world = dry_world();
        world.spawn_agent(1, Cell::new(0, 0), Team::Red).unwrap();
        {
            let mut body = world.body(1).unwrap();
            assert!(body.attempt_move(Direction::East));
            assert!(!body.is_action_ready());
            assert!(!body.attempt_move(Direction::East));
        }
        world.end_tick();
        assert_eq!(world.position_of(1), Some(Cell::new(1, 0)));
        assert!(world.body(1).unwrap().is_action_ready());
    }

    #[test]
    fn sensing_respects_radius_and_walls() {
        let mut world = dry_world();
        world.add_wall(Cell::new(1, 0));
        world.spawn_agent(1, Cell::new(0, 0), Team::Red).unwrap();
        let body = world.body(1).unwrap();
        let sensed = body.sense_cells();
        // radius² 8 reaches the corners of the 5x5 square
        assert_eq!(sensed.len(), 24);
        let wall = sensed.iter().find(|s| s.cell == Cell::new(1, 0)).unwrap();
        assert!(wall.occupied);
        assert!(!body.can_occupy(Cell::new(1, 0)));
    }

    #[test]
    fn flooded_cells_cannot_be_entered() {
        let mut world = GridWorld::new(HazardModel::new(HazardCurve::Constant { level: 3 }, 0), 2)
            .with_default_elevation(10);
        world.set_elevation(Cell::new(0, 1), 1);
        world.spawn_agent(1, Cell::new(0, 0), Team::Red).unwrap();
        let mut body = world.body(1).unwrap();
        assert!(body.is_hazardous(Cell::new(0, 1)));
        assert!(!body.attempt_move(Direction::North));
        assert!(body.attempt_move(Direction::South));
    }

    #[test]
    fn yielding_ends_the_turn() {
        let mut world = dry_world();
        world.spawn_agent(1, Cell::new(0, 0), Team::Red).unwrap();
        let mut body = world.body(1).unwrap();
        body.yield_turn();
        assert!(!body.is_action_ready());
        assert!(!body.attempt_move(Direction::North));
    }

    #[test]
    fn unknown_agents_have_no_body() {
        let mut world = dry_world();
        assert!(matches!(world.body(9), Err(DomainError::UnknownAgent { id: 9 })));
    }
}
