pub mod bug;
pub mod graph;
pub mod movement;
pub mod navigator;
pub mod ports;
pub mod state;

pub use bug::*;
pub use graph::*;
pub use movement::wait_until_ready;
pub use navigator::*;
pub use ports::*;
pub use state::*;
