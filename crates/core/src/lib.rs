pub mod bank;
pub mod channel;
pub mod distribution;
pub mod error;
pub mod keeper;
pub mod store;

pub use bank::*;
pub use channel::*;
pub use error::*;
pub use keeper::*;
pub use store::*;
