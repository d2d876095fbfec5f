pub mod agent;
pub mod hazard;
pub mod ledger;
pub mod logger;
pub mod navigation;

pub use logger::*;
