//! Trajectory generator.
//!
//! Plays `rounds` fixed-stake bets against the injected random source
//! and records the running capital after every round.

use tracing::debug;

use super::random::RandomSource;
use crate::types::{SimulationParameters, Trajectory};

/// Emit a progress line every this many rounds.
const PROGRESS_INTERVAL: u32 = 100;

/// Simulate one player.
///
/// A draw strictly below `loss_probability_pct / 100` is a loss. The
/// returned series has exactly `params.rounds` entries and does not
/// include the starting capital. Parameters are not re-validated.
pub fn generate<S>(params: &SimulationParameters, source: &mut S) -> Trajectory
where
    S: RandomSource + ?Sized,
{
    let threshold = params.loss_threshold();
    let mut capital = params.initial_capital;
    let mut capital_series = Vec::with_capacity(params.rounds as usize);
    let mut wins = 0u32;
    let mut losses = 0u32;

    for round in 1..=params.rounds {
        if source.next_unit() < threshold {
            capital -= params.bet_size;
            losses += 1;
        } else {
            capital += params.bet_size;
            wins += 1;
        }
        capital_series.push(capital);

        if round % PROGRESS_INTERVAL == 0 {
            debug!(round, capital = format!("{capital:.2}"), "Simulation progress");
        }
    }

    debug!(
        final_capital = format!("{capital:.2}"),
        wins, losses, "Trajectory complete"
    );

    Trajectory {
        capital_series,
        wins,
        losses,
    }
}
