use crate::common::Cell;
use crate::domains::ledger::Category;
use serde::{Deserialize, Serialize};

/// What an agent does with its turn. One variant per role; all of them share the
/// same navigator and ledger transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Stationary; announces its own location once (e.g. a headquarters).
    Beacon { category: Category },
    /// Wanders and reports every structure it senses.
    Scout,
    /// Travels to `destination`, announcing it on arrival when `announce` is set.
    Courier {
        destination: Cell,
        #[serde(default)]
        announce: Option<Category>,
    },
    /// Heads for the current offensive target learned from the ledger; explores until
    /// one is known.
    Raider,
    /// Only reads the ledger.
    Listener,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Beacon { .. } => "beacon",
            Role::Scout => "scout",
            Role::Courier { .. } => "courier",
            Role::Raider => "raider",
            Role::Listener => "listener",
        }
    }
}
