pub mod context;
pub mod knowledge;
pub mod role;

pub use context::*;
pub use knowledge::*;
pub use role::*;
