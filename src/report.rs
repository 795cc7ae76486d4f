//! Presentation of simulation output.
//!
//! Two consumers sit downstream of the engine: a text summary for the
//! terminal, and chart-ready series for whatever draws the lines. Both
//! are rebuilt from scratch for every run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::types::{AggregateResult, SimulationRun};

// ---------------------------------------------------------------------------
// Text summary
// ---------------------------------------------------------------------------

/// Human-readable summary of an aggregate.
pub fn render_summary(agg: &AggregateResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Players:               {}\n", agg.player_count));
    out.push_str(&format!("Total rounds:          {}\n", agg.total_rounds));
    out.push_str(&format!("Wins:                  {}\n", agg.total_wins));
    out.push_str(&format!("Losses:                {}\n", agg.total_losses));
    out.push_str(&format!("Final capital (mean):  {:.2}\n", agg.mean_final_capital));
    if agg.player_count > 1 {
        out.push_str(&format!(
            "Final capital range:   {:.2} .. {:.2}\n",
            agg.min_final_capital, agg.max_final_capital
        ));
    }
    out.push_str(&format!("Lowest capital:        {:.2}\n", agg.min_capital_reached));
    out.push_str(&format!("Win rate:              {:.2}%\n", agg.empirical_win_rate_pct));
    out.push_str(&format!("Counterparty net gain: {:.2}\n", agg.counterparty_net_gain));
    out
}

impl fmt::Display for SimulationRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} ({})", self.run_id, self.generated_at.to_rfc3339())?;
        writeln!(f, "{}", self.params)?;
        if let Some(seed) = self.seed {
            writeln!(f, "Seed: {seed}")?;
        }
        write!(f, "{}", render_summary(&self.aggregate))?;
        let expected = self.params.expected_edge_per_round() * self.aggregate.total_rounds as f64;
        writeln!(f, "Expected counterparty gain: {expected:.2}")
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// One line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
}

/// Series for a capital-over-rounds line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Round numbers, starting at 1.
    pub labels: Vec<u32>,
    pub datasets: Vec<ChartSeries>,
    /// Flat line at the initial capital.
    pub reference: ChartSeries,
}

impl ChartData {
    pub fn from_run(run: &SimulationRun) -> Self {
        let rounds = run.params.rounds;
        let single = run.trajectories.len() == 1;

        let datasets = run
            .trajectories
            .iter()
            .enumerate()
            .map(|(i, t)| ChartSeries {
                label: if single {
                    "Capital".to_string()
                } else {
                    format!("Player {}", i + 1)
                },
                data: t.capital_series.clone(),
            })
            .collect();

        Self {
            labels: (1..=rounds).collect(),
            datasets,
            reference: ChartSeries {
                label: "Initial capital".to_string(),
                data: vec![run.params.initial_capital; rounds as usize],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write a run as pretty JSON.
pub fn write_json(run: &SimulationRun, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(run).context("Failed to serialise simulation run")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run to {}", path.display()))?;
    debug!(path = %path.display(), run_id = %run.run_id, "Run exported");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
