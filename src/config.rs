use crate::adapters::outbound::GridBounds;
use crate::common::Cell;
use crate::domains::agent::{Role, Team};
use crate::domains::hazard::HazardModel;
use crate::domains::ledger::{Category, StructureKind, TransportSettings};
use crate::domains::navigation::NavigatorSettings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigatorSettings,
    pub ledger: TransportSettings,
    pub hazard: HazardModel,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub ticks: u32,
    pub sensor_radius_squared: i64,
    pub ledger_capacity: usize,
    pub minimum_bid: u32,
    pub move_cooldown: u32,
    pub default_elevation: i32,
    pub bounds: Option<GridBounds>,
    pub walls: Vec<Cell>,
    pub elevations: Vec<ElevationSpec>,
    pub structures: Vec<StructureSpec>,
    pub agents: Vec<AgentSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationSpec {
    pub cell: Cell,
    pub elevation: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSpec {
    pub cell: Cell,
    pub kind: StructureKind,
    pub team: Team,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: u32,
    pub team: Team,
    pub spawn: Cell,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Agent events also go to this file when set.
    pub file: Option<String>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for SimulationConfig {
    /// A small demo match: a red HQ beacon, a courier that has to get around a wall,
    /// a scout, a raider waiting for orders and a blue listener.
    fn default() -> Self {
        Self {
            seed: 7,
            ticks: 80,
            sensor_radius_squared: 24,
            ledger_capacity: 7,
            minimum_bid: 1,
            move_cooldown: 1,
            default_elevation: 5,
            bounds: Some(GridBounds {
                min: Cell::new(-10, -10),
                max: Cell::new(20, 10),
            }),
            walls: (-2..=2).map(|y| Cell::new(6, y)).collect(),
            elevations: Vec::new(),
            structures: vec![StructureSpec {
                cell: Cell::new(14, 3),
                kind: StructureKind::Hq,
                team: Team::Blue,
            }],
            agents: vec![
                AgentSpec {
                    id: 1,
                    team: Team::Red,
                    spawn: Cell::new(0, 0),
                    role: Role::Beacon {
                        category: Category::FriendlyHqAtLocation,
                    },
                },
                AgentSpec {
                    id: 2,
                    team: Team::Red,
                    spawn: Cell::new(1, 1),
                    role: Role::Courier {
                        destination: Cell::new(12, 0),
                        announce: Some(Category::AttackAtLocation),
                    },
                },
                AgentSpec {
                    id: 3,
                    team: Team::Red,
                    spawn: Cell::new(-4, -1),
                    role: Role::Scout,
                },
                AgentSpec {
                    id: 4,
                    team: Team::Red,
                    spawn: Cell::new(-6, -4),
                    role: Role::Raider,
                },
                AgentSpec {
                    id: 5,
                    team: Team::Blue,
                    spawn: Cell::new(-5, 5),
                    role: Role::Listener,
                },
            ],
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then the TOML file if it exists, then `FLOODLINE__SECTION__KEY`
    /// environment variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix("FLOODLINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
