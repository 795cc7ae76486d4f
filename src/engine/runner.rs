//! Multi-player runner.
//!
//! Generates independent trajectories one after another from a single
//! random source, then aggregates them into a [`SimulationRun`].

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::aggregator::aggregate;
use super::generator::generate;
use super::random::{RandomSource, RngSource};
use crate::config::Limits;
use crate::types::{SimError, SimulationParameters, SimulationRequest, SimulationRun, Trajectory};

/// Generate `players` trajectories sequentially.
pub fn run_players<S>(
    params: &SimulationParameters,
    players: u32,
    source: &mut S,
) -> Vec<Trajectory>
where
    S: RandomSource + ?Sized,
{
    (0..players).map(|_| generate(params, source)).collect()
}

/// Run and aggregate with a caller-supplied source.
///
/// `seed` is recorded on the run for reproduction; it is not used to
/// seed `source`.
pub fn simulate_with<S>(
    params: &SimulationParameters,
    players: u32,
    seed: Option<u64>,
    source: &mut S,
) -> Result<SimulationRun, SimError>
where
    S: RandomSource + ?Sized,
{
    let run_id = Uuid::new_v4();
    info!(%run_id, players, %params, "Starting simulation");

    let trajectories = run_players(params, players, source);
    let aggregate = aggregate(&trajectories, params.bet_size)?;

    info!(
        %run_id,
        rounds = aggregate.total_rounds,
        wins = aggregate.total_wins,
        losses = aggregate.total_losses,
        mean_final_capital = format!("{:.2}", aggregate.mean_final_capital),
        counterparty_net_gain = format!("{:.2}", aggregate.counterparty_net_gain),
        "Simulation complete"
    );

    Ok(SimulationRun {
        run_id,
        generated_at: Utc::now(),
        params: *params,
        players,
        seed,
        trajectories,
        aggregate,
    })
}

/// Run with a seeded source, or an entropy-seeded one when `seed` is `None`.
pub fn simulate(
    params: &SimulationParameters,
    players: u32,
    seed: Option<u64>,
) -> Result<SimulationRun, SimError> {
    match seed {
        Some(s) => simulate_with(params, players, seed, &mut RngSource::seeded(s)),
        None => simulate_with(params, players, None, &mut RngSource::from_entropy()),
    }
}

/// Validate `request` against `limits`, then run it.
pub fn simulate_request(
    request: &SimulationRequest,
    limits: &Limits,
) -> Result<SimulationRun, SimError> {
    let validated = request.validate(limits)?;
    simulate(&validated.params, validated.players, validated.seed)
}
