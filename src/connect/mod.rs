//! Query execution through a middleware chain.

mod chain;
mod connection;
mod logger;

pub use chain::*;
pub use connection::*;
pub use logger::*;
