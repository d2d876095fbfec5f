use super::agent_runtime::{AgentRuntime, TurnAction, TurnReport};
use crate::adapters::outbound::{GridWorld, InMemoryLedger};
use crate::common::{ApplicationResult, Cell, DomainError, DomainResult};
use crate::config::Config;
use crate::domains::agent::{AgentContext, Knowledge, Team};
use crate::domains::ledger::LedgerChannel;
use crate::domains::DynLogger;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: u32,
    pub team: Team,
    pub role: String,
    pub spawn: Cell,
    pub position: Cell,
    pub moves: u32,
    pub blocked_turns: u32,
    pub arrived: bool,
    pub pending: bool,
    pub knowledge: Knowledge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub ticks: u32,
    pub ledger_entries: usize,
    pub agents: Vec<AgentSummary>,
}

/// Drives every agent through the shared grid and ledger, one tick at a time. Agents
/// act in id order; the ledger round and the hazard clock advance together.
pub struct Simulation {
    world: GridWorld,
    ledger: InMemoryLedger,
    agents: Vec<AgentRuntime>,
    rng: StdRng,
    seed: u64,
    ticks_run: u32,
    moves: Vec<u32>,
    blocked: Vec<u32>,
    arrived: Vec<bool>,
    logger: DynLogger,
}

impl Simulation {
    pub fn from_config(config: &Config, logger: DynLogger) -> DomainResult<Self> {
        let sim = &config.simulation;
        let mut world = GridWorld::new(config.hazard, sim.sensor_radius_squared)
            .with_default_elevation(sim.default_elevation)
            .with_move_cooldown(sim.move_cooldown);
        if let Some(bounds) = sim.bounds {
            world = world.with_bounds(bounds);
        }
        world.add_walls(sim.walls.iter().copied());
        for spec in &sim.elevations {
            world.set_elevation(spec.cell, spec.elevation);
        }
        for spec in &sim.structures {
            world.add_structure(spec.cell, spec.kind, spec.team);
        }

        let ledger = InMemoryLedger::new(sim.ledger_capacity, sim.minimum_bid);
        let mut specs = sim.agents.clone();
        specs.sort_by_key(|spec| spec.id);

        let mut agents = Vec::with_capacity(specs.len());
        for spec in specs {
            world.spawn_agent(spec.id, spec.spawn, spec.team)?;
            let context = AgentContext::new(spec.id, spec.team, ledger.current_round(), spec.spawn);
            agents.push(AgentRuntime::new(
                context,
                spec.role,
                config.navigation,
                config.ledger,
                config.hazard,
                logger.clone(),
            ));
        }

        let count = agents.len();
        Ok(Self {
            world,
            ledger,
            agents,
            rng: StdRng::seed_from_u64(sim.seed),
            seed: sim.seed,
            ticks_run: 0,
            moves: vec![0; count],
            blocked: vec![0; count],
            arrived: vec![false; count],
            logger,
        })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    pub fn agents(&self) -> &[AgentRuntime] {
        &self.agents
    }

    pub fn agent(&self, id: u32) -> Option<&AgentRuntime> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    /// One tick: every agent takes its turn, then the tick closes.
    pub fn step(&mut self) -> DomainResult<Vec<TurnReport>> {
        let mut reports = Vec::with_capacity(self.agents.len());
        for (index, agent) in self.agents.iter_mut().enumerate() {
            let mut body = self.world.body(agent.id())?;
            let report = agent.take_turn(&mut body, &mut self.ledger, &mut self.rng);
            if report.from != report.to {
                self.moves[index] += 1;
            }
            match report.action {
                TurnAction::Blocked => self.blocked[index] += 1,
                TurnAction::Arrived => self.arrived[index] = true,
                TurnAction::Held | TurnAction::Moved => {}
            }
            debug!(?report, "turn");
            reports.push(report);
        }
        self.world.end_tick();
        self.ledger.advance_round();
        self.ticks_run += 1;
        Ok(reports)
    }

    pub fn run(&mut self, ticks: u32) -> DomainResult<SimulationSummary> {
        info!(ticks, agents = self.agents.len(), seed = self.seed, "simulation started");
        self.logger.info(&format!(
            "running {} agents for {} ticks",
            self.agents.len(),
            ticks
        ));
        for _ in 0..ticks {
            self.step()?;
        }
        let summary = self.summary();
        info!(ledger_entries = summary.ledger_entries, "simulation finished");
        Ok(summary)
    }

    pub fn summary(&self) -> SimulationSummary {
        let agents = self
            .agents
            .iter()
            .enumerate()
            .map(|(index, agent)| AgentSummary {
                id: agent.id(),
                team: agent.context().team,
                role: agent.role().name().to_string(),
                spawn: agent.context().spawn_cell,
                position: self.world.position_of(agent.id()).unwrap_or(agent.context().spawn_cell),
                moves: self.moves[index],
                blocked_turns: self.blocked[index],
                arrived: self.arrived[index],
                pending: agent.transport().has_pending(),
                knowledge: agent.knowledge().clone(),
            })
            .collect();
        SimulationSummary {
            seed: self.seed,
            ticks: self.ticks_run,
            ledger_entries: self.ledger.total_entries(),
            agents,
        }
    }
}

/// Runs the configured match for `simulation.ticks` and renders the summary as JSON.
pub fn run_configured(config: &Config, logger: DynLogger) -> ApplicationResult<String> {
    let mut simulation = Simulation::from_config(config, logger)?;
    let summary = simulation.run(config.simulation.ticks)?;
    let rendered = serde_json::to_string_pretty(&summary).map_err(DomainError::from)?;
    Ok(rendered)
}
