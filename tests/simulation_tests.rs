use floodline::adapters::outbound::{init_noop_logger, GridWorld, InMemoryLedger, MultiLogger};
use floodline::application::{AgentRuntime, Simulation, TurnAction};
use floodline::common::Cell;
use floodline::config::{AgentSpec, Config, StructureSpec};
use floodline::domains::agent::{AgentContext, Role, Team};
use floodline::domains::hazard::{HazardCurve, HazardModel};
use floodline::domains::ledger::{Category, LedgerChannel, StructureKind, TransportSettings};
use floodline::domains::logger::DomainLogger;
use floodline::domains::navigation::NavigatorSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    messages: Mutex<Vec<String>>,
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

fn dry() -> HazardModel {
    HazardModel::new(HazardCurve::Constant { level: 0 }, 0)
}

fn runtime(id: u32, spawn: Cell, role: Role, logger: Arc<dyn DomainLogger>) -> AgentRuntime {
    AgentRuntime::new(
        AgentContext::new(id, Team::Red, 1, spawn),
        role,
        NavigatorSettings::default(),
        TransportSettings::default(),
        dry(),
        logger,
    )
}

#[test]
fn test_demo_scenario_spreads_facts() {
    let config = Config::default();
    let mut simulation = Simulation::from_config(&config, init_noop_logger()).unwrap();
    let summary = simulation.run(config.simulation.ticks).unwrap();

    assert_eq!(summary.ticks, config.simulation.ticks);
    assert_eq!(summary.agents.len(), 5);

    let courier = summary.agents.iter().find(|agent| agent.id == 2).unwrap();
    assert!(courier.arrived);
    assert_eq!(courier.position, Cell::new(12, 0));

    for agent in summary.agents.iter().filter(|agent| agent.id != 1) {
        assert_eq!(agent.knowledge.home_base, Some(Cell::new(0, 0)), "agent {}", agent.id);
        assert_eq!(agent.knowledge.attack_target, Some(Cell::new(12, 0)), "agent {}", agent.id);
    }
    assert!(summary.ledger_entries >= 2);
}

#[test]
fn test_same_seed_same_match() {
    let config = Config::default();
    let run = || {
        let mut simulation = Simulation::from_config(&config, init_noop_logger()).unwrap();
        serde_json::to_string(&simulation.run(40).unwrap()).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_duplicate_agent_ids_are_rejected() {
    let mut config = Config::default();
    let duplicate = AgentSpec {
        id: 2,
        team: Team::Blue,
        spawn: Cell::new(-8, -8),
        role: Role::Listener,
    };
    config.simulation.agents.push(duplicate);
    assert!(Simulation::from_config(&config, init_noop_logger()).is_err());
}

#[test]
fn test_courier_announces_on_arrival() {
    let capture = Arc::new(CaptureLogger { messages: Mutex::new(Vec::new()) });
    let mut world = GridWorld::new(dry(), 24);
    world.spawn_agent(7, Cell::new(0, 0), Team::Red).unwrap();
    let mut ledger = InMemoryLedger::new(7, 1);
    let mut rng = StdRng::seed_from_u64(3);
    let role = Role::Courier { destination: Cell::new(3, 0), announce: Some(Category::SoupAtLocation) };
    let mut agent = runtime(7, Cell::new(0, 0), role, capture.clone());

    let mut actions = Vec::new();
    for _ in 0..4 {
        let mut body = world.body(7).unwrap();
        let report = agent.take_turn(&mut body, &mut ledger, &mut rng);
        actions.push(report.action);
        world.end_tick();
        ledger.advance_round();
    }

    assert_eq!(
        actions,
        vec![TurnAction::Moved, TurnAction::Moved, TurnAction::Arrived, TurnAction::Held]
    );
    let fact = agent
        .transport()
        .find_in_round(&ledger, 3, Category::SoupAtLocation)
        .unwrap();
    assert_eq!(fact.location, Cell::new(3, 0));
    let messages = capture.messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("reached (3, 0)")));
}

#[test]
fn test_scout_reports_sighted_structures_once() {
    let mut world = GridWorld::new(dry(), 24);
    world.add_structure(Cell::new(2, 2), StructureKind::Refinery, Team::Blue);
    world.add_structure(Cell::new(-2, 0), StructureKind::DesignSchool, Team::Red);
    world.spawn_agent(4, Cell::new(0, 0), Team::Red).unwrap();
    let mut ledger = InMemoryLedger::new(7, 1);
    let mut rng = StdRng::seed_from_u64(5);
    let mut agent = runtime(4, Cell::new(0, 0), Role::Scout, init_noop_logger());

    let first = {
        let mut body = world.body(4).unwrap();
        agent.take_turn(&mut body, &mut ledger, &mut rng)
    };
    assert_eq!(first.published, 2);
    world.end_tick();
    ledger.advance_round();

    assert_eq!(ledger.read(1).len(), 2);
    assert!(agent.transport().find_in_round(&ledger, 1, Category::EnemyRefineryAtLocation).is_some());
    assert!(agent
        .transport()
        .find_in_round(&ledger, 1, Category::FriendlyDesignSchoolAtLocation)
        .is_some());

    let second = {
        let mut body = world.body(4).unwrap();
        agent.take_turn(&mut body, &mut ledger, &mut rng)
    };
    assert_eq!(second.published, 0);
    assert_eq!(second.facts_read, 2);
    assert!(agent.knowledge().structures.contains_key(&Cell::new(2, 2)));
}

#[test]
fn test_replaced_pending_fact_is_logged_to_every_sink() {
    let file_side = Arc::new(CaptureLogger { messages: Mutex::new(Vec::new()) });
    let console_side = Arc::new(CaptureLogger { messages: Mutex::new(Vec::new()) });
    let logger = Arc::new(MultiLogger::new(file_side.clone(), Some(console_side.clone())));
    let mut ledger = InMemoryLedger::new(0, 1);
    let mut rng = StdRng::seed_from_u64(9);
    let mut agent = runtime(4, Cell::new(0, 0), Role::Scout, logger);

    assert!(!agent.publish_fact(&mut ledger, &mut rng, Category::EnemyRefineryAtLocation, Cell::new(2, 2)));
    assert!(!agent.publish_fact(&mut ledger, &mut rng, Category::EnemyHqAtLocation, Cell::new(9, 1)));

    let pending = agent.transport().pending().unwrap();
    assert_eq!(pending.category, Category::EnemyHqAtLocation);
    for sink in [&file_side, &console_side] {
        let messages = sink.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("WARN:") && messages[0].contains("kept as pending"));
        assert!(messages[1].starts_with("WARN:") && messages[1].contains("replaced by EnemyHqAtLocation at (9, 1)"));
    }
}

#[test]
fn test_listener_learns_home_base_from_first_round() {
    let mut config = Config::default();
    config.ledger.history_window = 1;
    config.simulation.agents = vec![
        AgentSpec {
            id: 1,
            team: Team::Red,
            spawn: Cell::new(0, 0),
            role: Role::Beacon { category: Category::FriendlyHqAtLocation },
        },
        AgentSpec {
            id: 2,
            team: Team::Red,
            spawn: Cell::new(-4, 4),
            role: Role::Listener,
        },
    ];
    config.simulation.structures = vec![StructureSpec {
        cell: Cell::new(14, 3),
        kind: StructureKind::Hq,
        team: Team::Blue,
    }];
    let mut simulation = Simulation::from_config(&config, init_noop_logger()).unwrap();
    simulation.run(5).unwrap();

    let listener = simulation.agent(2).unwrap();
    assert_eq!(listener.knowledge().home_base, Some(Cell::new(0, 0)));
    assert_eq!(simulation.ledger().block(1).len(), 1);
}

#[test]
fn test_run_configured_renders_json_summary() {
    let mut config = Config::default();
    config.simulation.ticks = 5;
    let rendered = floodline::application::run_configured(&config, init_noop_logger()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["ticks"], 5);
    assert_eq!(value["agents"].as_array().map(Vec::len), Some(5));
}
