pub mod agent_runtime;
pub mod simulation;

pub use agent_runtime::*;
pub use simulation::*;
