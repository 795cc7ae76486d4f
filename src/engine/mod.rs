//! Core engine — trajectory generation and aggregation.

pub mod random;
pub mod generator;
pub mod aggregator;
pub mod runner;

pub use aggregator::aggregate;
pub use generator::generate;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use runner::{run_players, simulate, simulate_request, simulate_with};
