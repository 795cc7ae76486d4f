//! End-to-end simulation harness.
//!
//! Drives the engine through its public API with scripted and seeded
//! sources and checks the documented trajectory and aggregate properties.

use wagersim::config::{AppConfig, Limits};
use wagersim::engine::{
    aggregate, generate, run_players, simulate, simulate_with, RngSource, ScriptedSource,
};
use wagersim::report::{render_summary, ChartData};
use wagersim::types::{SimError, SimulationParameters, SimulationRequest, Trajectory};

fn params(loss_pct: f64, rounds: u32) -> SimulationParameters {
    SimulationParameters {
        initial_capital: 1000.0,
        bet_size: 10.0,
        loss_probability_pct: loss_pct,
        rounds,
    }
}

#[test]
fn test_worked_example_end_to_end() {
    let mut src = ScriptedSource::new(vec![0.1, 0.6, 0.2, 0.9]);
    let run = simulate_with(&params(50.0, 4), 1, None, &mut src).unwrap();

    let t = &run.trajectories[0];
    assert_eq!(t.capital_series, vec![990.0, 1000.0, 990.0, 1000.0]);
    assert_eq!((t.wins, t.losses), (2, 2));
    assert_eq!(run.aggregate.mean_final_capital, 1000.0);
    assert_eq!(run.aggregate.empirical_win_rate_pct, 50.0);
    assert_eq!(run.aggregate.counterparty_net_gain, 0.0);
}

#[test]
fn test_closure_drives_generator() {
    let mut calls = 0u32;
    let mut src = || {
        calls += 1;
        0.0
    };
    let t = generate(&params(10.0, 25), &mut src);
    assert_eq!(t.losses, 25);
    assert_eq!(calls, 25);
}

#[test]
fn test_trajectory_invariants_across_many_players() {
    let p = SimulationParameters {
        initial_capital: 250.0,
        bet_size: 0.5,
        loss_probability_pct: 52.63,
        rounds: 1_000,
    };
    let mut src = RngSource::seeded(2024);
    let trajectories = run_players(&p, 50, &mut src);

    for t in &trajectories {
        assert_eq!(t.capital_series.len(), 1_000);
        assert_eq!(t.wins + t.losses, 1_000);
        let expected = p.initial_capital + (t.wins as f64 - t.losses as f64) * p.bet_size;
        assert!((t.final_capital().unwrap() - expected).abs() < 1e-9);
    }

    let agg = aggregate(&trajectories, p.bet_size).unwrap();
    assert_eq!(agg.total_rounds, 50_000);
    assert_eq!(agg.total_wins + agg.total_losses, agg.total_rounds);
    let expected_gain = (agg.total_losses as f64 - agg.total_wins as f64) * p.bet_size;
    assert_eq!(agg.counterparty_net_gain, expected_gain);
}

#[test]
fn test_empirical_win_rate_tracks_probability() {
    let run = simulate(&params(30.0, 10_000), 10, Some(17)).unwrap();
    // 100k Bernoulli(0.7) trials: standard error is ~0.15 percentage points.
    assert!((run.aggregate.empirical_win_rate_pct - 70.0).abs() < 1.5);
    assert!(run.aggregate.counterparty_net_gain < 0.0);
}

#[test]
fn test_mean_of_two_players() {
    let a = Trajectory { capital_series: vec![1000.0], wins: 1, losses: 1 };
    let b = Trajectory { capital_series: vec![1200.0], wins: 2, losses: 0 };
    let agg = aggregate(&[a, b], 100.0).unwrap();
    assert_eq!(agg.mean_final_capital, 1100.0);
}

#[test]
fn test_empty_aggregate_rejected() {
    assert!(matches!(aggregate(&[], 1.0), Err(SimError::EmptyAggregate)));
}

#[test]
fn test_request_to_chart_pipeline() {
    let cfg = AppConfig::default();
    let req = SimulationRequest {
        initial_capital: 100.0,
        bet_size: 1.0,
        loss_probability_pct: 33.3,
        win_probability_pct: Some(66.7),
        rounds: 30,
        players: 4,
        seed: Some(8),
    };
    let validated = req.validate(&cfg.limits).unwrap();
    let run = simulate(&validated.params, validated.players, validated.seed).unwrap();
    let chart = ChartData::from_run(&run);

    assert_eq!(chart.datasets.len(), 4);
    assert_eq!(chart.labels.first(), Some(&1));
    assert_eq!(chart.labels.last(), Some(&30));
    assert!(chart.reference.data.iter().all(|v| *v == 100.0));

    let text = render_summary(&run.aggregate);
    assert!(text.contains("Total rounds:          120"));
}

#[test]
fn test_limits_are_configurable() {
    let cfg = AppConfig::parse("[limits]\nmax_rounds = 10\nmax_players = 2").unwrap();
    assert_eq!(cfg.limits, Limits { max_rounds: 10, max_players: 2 });

    let mut req = cfg.simulation.to_request();
    req.rounds = 10;
    assert!(req.validate(&cfg.limits).is_ok());
    req.rounds = 11;
    assert!(req.validate(&cfg.limits).is_err());
}
