//! WAGERSIM — Monte Carlo bankroll simulator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod report;
pub mod dashboard;
