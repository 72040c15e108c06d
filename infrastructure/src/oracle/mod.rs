//! Oracle adapters.

mod simulated;

pub use simulated::{SimulatedOracle, unreliable};
