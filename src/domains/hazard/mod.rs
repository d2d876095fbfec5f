pub mod curve;
pub mod model;

pub use curve::*;
pub use model::*;
