//! Aggregate statistics over a set of trajectories.

use crate::types::{AggregateResult, SimError, Trajectory};

/// Combine trajectories into summary statistics.
///
/// Fails with [`SimError::EmptyAggregate`] when there is nothing to
/// average: no trajectories, or a trajectory that played no rounds.
pub fn aggregate(trajectories: &[Trajectory], bet_size: f64) -> Result<AggregateResult, SimError> {
    let finals: Vec<f64> = trajectories
        .iter()
        .map(Trajectory::final_capital)
        .collect::<Option<_>>()
        .ok_or(SimError::EmptyAggregate)?;
    if finals.is_empty() {
        return Err(SimError::EmptyAggregate);
    }

    let total_wins: u64 = trajectories.iter().map(|t| u64::from(t.wins)).sum();
    let total_losses: u64 = trajectories.iter().map(|t| u64::from(t.losses)).sum();
    let total_rounds: u64 = trajectories.iter().map(|t| u64::from(t.rounds())).sum();
    if total_rounds == 0 {
        return Err(SimError::EmptyAggregate);
    }

    let mean_final_capital = finals.iter().sum::<f64>() / finals.len() as f64;
    let min_final_capital = finals.iter().copied().fold(f64::INFINITY, f64::min);
    let max_final_capital = finals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_capital_reached = trajectories
        .iter()
        .filter_map(Trajectory::min_capital)
        .fold(f64::INFINITY, f64::min);

    Ok(AggregateResult {
        player_count: trajectories.len(),
        total_rounds,
        total_wins,
        total_losses,
        mean_final_capital,
        empirical_win_rate_pct: 100.0 * total_wins as f64 / total_rounds as f64,
        counterparty_net_gain: (total_losses as f64 - total_wins as f64) * bet_size,
        min_final_capital,
        max_final_capital,
        min_capital_reached,
    })
}
