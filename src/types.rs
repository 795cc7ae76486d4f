//! Shared types for the WAGERSIM simulator.
//!
//! These types form the data model used across all modules: the
//! parameters of a run, the trajectories it produces, the aggregate
//! statistics computed over them, and the request/validation layer
//! that turns untrusted input into parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::Limits;

/// Allowed slack when checking that loss + win probabilities sum to 100.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Simulation parameters
// ---------------------------------------------------------------------------

/// Parameters for a single trajectory.
///
/// Win probability is never stored; it is always `100 - loss_probability_pct`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub initial_capital: f64,
    pub bet_size: f64,
    /// Chance of losing a round, in percent (0–100).
    pub loss_probability_pct: f64,
    pub rounds: u32,
}

impl SimulationParameters {
    /// Chance of winning a round, in percent.
    pub fn win_probability_pct(&self) -> f64 {
        100.0 - self.loss_probability_pct
    }

    /// Loss threshold in unit space: a draw below this value is a loss.
    pub fn loss_threshold(&self) -> f64 {
        self.loss_probability_pct / 100.0
    }

    /// Expected counterparty gain per round, in currency.
    pub fn expected_edge_per_round(&self) -> f64 {
        (self.loss_threshold() * 2.0 - 1.0) * self.bet_size
    }
}

impl fmt::Display for SimulationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capital {:.2} | bet {:.2} | loss {:.2}% / win {:.2}% | {} rounds",
            self.initial_capital,
            self.bet_size,
            self.loss_probability_pct,
            self.win_probability_pct(),
            self.rounds,
        )
    }
}

/// Split a raw loss percentage into `(loss, win)`.
///
/// Non-finite or negative input collapses to 0, anything above 100 to 100.
pub fn complement_probability(loss_pct: f64) -> (f64, f64) {
    let loss = if !loss_pct.is_finite() || loss_pct < 0.0 {
        0.0
    } else {
        loss_pct.min(100.0)
    };
    (loss, 100.0 - loss)
}

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Running capital after each round of one simulated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Capital after every round. Never contains the starting value.
    pub capital_series: Vec<f64>,
    pub wins: u32,
    pub losses: u32,
}

impl Trajectory {
    pub fn rounds(&self) -> u32 {
        self.wins + self.losses
    }

    /// Capital after the last round, if any round was played.
    pub fn final_capital(&self) -> Option<f64> {
        self.capital_series.last().copied()
    }

    /// Lowest capital reached during the run.
    pub fn min_capital(&self) -> Option<f64> {
        self.capital_series.iter().copied().reduce(f64::min)
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Summary statistics over a set of trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub player_count: usize,
    pub total_rounds: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub mean_final_capital: f64,
    /// `100 * total_wins / total_rounds`.
    pub empirical_win_rate_pct: f64,
    /// Net amount gained by the side opposite every bet.
    pub counterparty_net_gain: f64,
    pub min_final_capital: f64,
    pub max_final_capital: f64,
    /// Lowest capital any player held after any round.
    pub min_capital_reached: f64,
}

// ---------------------------------------------------------------------------
// Simulation run
// ---------------------------------------------------------------------------

/// Everything produced by one simulation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub params: SimulationParameters,
    pub players: u32,
    /// Seed used for the random source, `None` for entropy-seeded runs.
    pub seed: Option<u64>,
    pub trajectories: Vec<Trajectory>,
    pub aggregate: AggregateResult,
}

// ---------------------------------------------------------------------------
// Requests and validation
// ---------------------------------------------------------------------------

fn default_players() -> u32 {
    1
}

/// Untrusted simulation input, as submitted over HTTP or the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub initial_capital: f64,
    pub bet_size: f64,
    pub loss_probability_pct: f64,
    /// Optional; when present it must complement the loss probability.
    #[serde(default)]
    pub win_probability_pct: Option<f64>,
    pub rounds: u32,
    #[serde(default = "default_players")]
    pub players: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub params: SimulationParameters,
    pub players: u32,
    pub seed: Option<u64>,
}

impl SimulationRequest {
    /// Check every field against `limits` and build the parameters.
    pub fn validate(&self, limits: &Limits) -> Result<ValidatedRequest, ParamError> {
        if !self.initial_capital.is_finite() || self.initial_capital < 0.0 {
            return Err(ParamError::NegativeCapital(self.initial_capital));
        }
        if !self.bet_size.is_finite() || self.bet_size < 0.0 {
            return Err(ParamError::NegativeBet(self.bet_size));
        }
        if !(0.0..=100.0).contains(&self.loss_probability_pct) {
            return Err(ParamError::ProbabilityOutOfRange(self.loss_probability_pct));
        }
        if let Some(win) = self.win_probability_pct {
            let sum = self.loss_probability_pct + win;
            if !sum.is_finite() || (sum - 100.0).abs() > PROBABILITY_SUM_TOLERANCE {
                return Err(ParamError::ProbabilitySum(sum));
            }
        }
        if self.rounds == 0 || self.rounds > limits.max_rounds {
            return Err(ParamError::RoundsOutOfRange {
                rounds: self.rounds,
                max: limits.max_rounds,
            });
        }
        if self.players == 0 || self.players > limits.max_players {
            return Err(ParamError::PlayersOutOfRange {
                players: self.players,
                max: limits.max_players,
            });
        }

        Ok(ValidatedRequest {
            params: SimulationParameters {
                initial_capital: self.initial_capital,
                bet_size: self.bet_size,
                loss_probability_pct: self.loss_probability_pct,
                rounds: self.rounds,
            },
            players: self.players,
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a simulation request is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("Initial capital must be zero or greater, got {0}")]
    NegativeCapital(f64),

    #[error("Bet size must be zero or greater, got {0}")]
    NegativeBet(f64),

    #[error("Loss probability must be between 0 and 100, got {0}")]
    ProbabilityOutOfRange(f64),

    #[error("Loss and win probabilities must sum to 100%, got {0}")]
    ProbabilitySum(f64),

    #[error("Round count must be between 1 and {max}, got {rounds}")]
    RoundsOutOfRange { rounds: u32, max: u32 },

    #[error("Player count must be between 1 and {max}, got {players}")]
    PlayersOutOfRange { players: u32, max: u32 },
}

/// Errors raised by the simulation library.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),

    #[error("Cannot aggregate: no trajectories or no rounds played")]
    EmptyAggregate,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
