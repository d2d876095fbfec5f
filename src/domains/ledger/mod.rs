pub mod category;
pub mod codec;
pub mod ports;
pub mod transport;

pub use category::*;
pub use codec::*;
pub use ports::*;
pub use transport::*;
