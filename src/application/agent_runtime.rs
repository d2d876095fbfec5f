use crate::common::Cell;
use crate::domains::agent::{AgentContext, Knowledge, Role};
use crate::domains::ledger::{Category, Fact, LedgerChannel, LedgerTransport, TransportSettings};
use crate::domains::navigation::{AgentBody, Navigator, NavigatorSettings, RouteOutcome};
use crate::domains::hazard::HazardModel;
use crate::domains::DynLogger;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// What the agent ended up doing with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    Held,
    Moved,
    Arrived,
    Blocked,
}

impl From<RouteOutcome> for TurnAction {
    fn from(outcome: RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Moved => TurnAction::Moved,
            RouteOutcome::Arrived => TurnAction::Arrived,
            RouteOutcome::Blocked => TurnAction::Blocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub agent: u32,
    pub round: u32,
    pub turn: u32,
    pub from: Cell,
    pub to: Cell,
    pub action: TurnAction,
    pub facts_read: usize,
    pub published: usize,
    pub pending_delivered: bool,
}

/// One agent: its context, role, navigator, ledger transport and what it has learned.
pub struct AgentRuntime {
    context: AgentContext,
    role: Role,
    navigator: Navigator,
    transport: LedgerTransport,
    knowledge: Knowledge,
    reported: BTreeSet<Cell>,
    announced: bool,
    logger: DynLogger,
}

impl AgentRuntime {
    pub fn new(
        context: AgentContext,
        role: Role,
        navigation: NavigatorSettings,
        ledger: TransportSettings,
        hazard: HazardModel,
        logger: DynLogger,
    ) -> Self {
        Self {
            context,
            role,
            navigator: Navigator::new(navigation, hazard),
            transport: LedgerTransport::new(ledger),
            knowledge: Knowledge::default(),
            reported: BTreeSet::new(),
            announced: false,
            logger,
        }
    }

    pub fn id(&self) -> u32 {
        self.context.id
    }

    pub fn context(&self) -> &AgentContext {
        &self.context
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn transport(&self) -> &LedgerTransport {
        &self.transport
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    /// Runs one turn: retry the pending transaction, read the ledger, then act
    /// according to the role.
    pub fn take_turn<B, C, R>(&mut self, body: &mut B, ledger: &mut C, rng: &mut R) -> TurnReport
    where
        B: AgentBody + ?Sized,
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        let round = ledger.current_round();
        self.context.begin_turn(round);

        let pending_delivered = self.transport.flush_pending(ledger, rng);
        if pending_delivered {
            self.logger
                .info(&format!("agent {} delivered its pending transaction", self.context.id));
        }

        let facts = self.read_ledger(ledger);
        self.absorb(&facts);
        if self.knowledge.home_base.is_none() {
            self.learn_home_base(ledger);
        }

        let from = body.position();
        let mut published = 0;
        let action = match self.role.clone() {
            Role::Beacon { category } => {
                if !self.announced {
                    self.publish_fact(ledger, rng, category, from);
                    self.announced = true;
                    published += 1;
                }
                TurnAction::Held
            }
            Role::Scout => {
                published += self.report_structures(body, ledger, rng);
                self.explore(body, rng)
            }
            Role::Courier { destination, announce } => {
                if self.announced {
                    TurnAction::Held
                } else {
                    let action = TurnAction::from(self.navigator.route_to(body, destination));
                    if action == TurnAction::Arrived {
                        self.logger.info(&format!(
                            "agent {} reached {} on turn {}",
                            self.context.id,
                            destination,
                            self.context.turn_count()
                        ));
                        if let Some(category) = announce {
                            self.publish_fact(ledger, rng, category, destination);
                            published += 1;
                        }
                        self.announced = true;
                    }
                    action
                }
            }
            Role::Raider => match self.knowledge.offensive_target() {
                Some(target) => match self.navigator.route_to(body, target) {
                    RouteOutcome::Arrived => TurnAction::Held,
                    outcome => outcome.into(),
                },
                None => self.explore(body, rng),
            },
            Role::Listener => TurnAction::Held,
        };

        TurnReport {
            agent: self.context.id,
            round,
            turn: self.context.turn_count(),
            from,
            to: body.position(),
            action,
            facts_read: facts.len(),
            published,
            pending_delivered,
        }
    }

    /// Publishes at the configured default bid.
    pub fn publish_fact<C, R>(&mut self, ledger: &mut C, rng: &mut R, category: Category, location: Cell) -> bool
    where
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        let bid = self.transport.settings().default_bid;
        let previous = self.transport.pending().copied();
        let accepted = self.transport.publish(ledger, rng, category, location, bid);
        if !accepted {
            match previous {
                Some(previous) => self.logger.warn(&format!(
                    "agent {}: pending {:?} at {} replaced by {:?} at {}",
                    self.context.id, previous.category, previous.location, category, location
                )),
                None => self.logger.warn(&format!(
                    "agent {}: {:?} at {} refused, kept as pending",
                    self.context.id, category, location
                )),
            }
        }
        accepted
    }

    /// Headquarters are announced in the first round; looks there if the regular
    /// history scan no longer reaches it.
    pub fn learn_home_base<C: LedgerChannel + ?Sized>(&mut self, ledger: &C) -> Option<Cell> {
        let fact = self
            .transport
            .find_in_round(ledger, 1, Category::FriendlyHqAtLocation)?;
        self.absorb(&[fact]);
        self.knowledge.home_base
    }

    /// The whole history window on the first turn, the previous round afterwards.
    fn read_ledger<C: LedgerChannel + ?Sized>(&self, ledger: &C) -> Vec<Fact> {
        let round = self.context.round();
        if self.context.turn_count() == 1 {
            self.transport.decoded_facts_since(ledger, 1)
        } else {
            round
                .checked_sub(1)
                .map(|previous| self.transport.facts_in_round(ledger, previous))
                .unwrap_or_default()
        }
    }

    fn absorb(&mut self, facts: &[Fact]) {
        let had_enemy_base = self.knowledge.is_enemy_base_located();
        self.knowledge.absorb_all(facts);
        if !had_enemy_base {
            if let Some(base) = self.knowledge.enemy_base {
                self.logger
                    .info(&format!("agent {} learned enemy base at {}", self.context.id, base));
            }
        }
    }

    /// Publishes every sensed structure not reported before. Returns how many.
    fn report_structures<B, C, R>(&mut self, body: &B, ledger: &mut C, rng: &mut R) -> usize
    where
        B: AgentBody + ?Sized,
        C: LedgerChannel + ?Sized,
        R: Rng + ?Sized,
    {
        let mut published = 0;
        for structure in body.sense_structures() {
            if self.knowledge.structures.contains_key(&structure.cell) || !self.reported.insert(structure.cell) {
                continue;
            }
            let category = Category::locating(structure.kind, structure.friendly);
            debug!(agent = self.context.id, ?category, cell = %structure.cell, "structure sighted");
            self.publish_fact(ledger, rng, category, structure.cell);
            published += 1;
        }
        published
    }

    fn explore<B, R>(&mut self, body: &mut B, rng: &mut R) -> TurnAction
    where
        B: AgentBody + ?Sized,
        R: Rng + ?Sized,
    {
        if self.navigator.continue_search(body, rng) || self.navigator.move_anywhere(body, rng).is_some() {
            TurnAction::Moved
        } else {
            TurnAction::Blocked
        }
    }
}
