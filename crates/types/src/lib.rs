pub mod coins;
pub mod fee;
pub mod packet;

pub use coins::*;
pub use fee::*;
pub use packet::*;
