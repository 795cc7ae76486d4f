//! WAGERSIM — Monte Carlo bankroll simulator
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then either runs one simulation and prints the summary, or serves
//! the simulator over HTTP until Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use wagersim::config::{self, AppConfig};
use wagersim::dashboard::{self, routes::DashboardState};
use wagersim::engine;
use wagersim::report;
use wagersim::types::{complement_probability, SimulationRequest};

#[derive(Parser, Debug)]
#[command(name = "wagersim")]
#[command(about = "Simulate fixed-stake betting and report capital trajectories")]
struct Args {
    /// Configuration file (TOML). Defaults apply when it is missing.
    #[arg(short, long, default_value = "config.toml", env = "WAGERSIM_CONFIG")]
    config: String,

    /// Serve the HTTP API instead of running once
    #[arg(long)]
    serve: bool,

    /// Port for the HTTP API (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Starting capital
    #[arg(long)]
    capital: Option<f64>,

    /// Stake per round
    #[arg(long)]
    bet: Option<f64>,

    /// Probability of losing a round, in percent
    #[arg(long)]
    loss_pct: Option<f64>,

    /// Rounds per player
    #[arg(long)]
    rounds: Option<u32>,

    /// Number of independent players
    #[arg(long)]
    players: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full run as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Also write the run as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the configured defaults.
    fn request(&self, cfg: &config::SimulationConfig) -> SimulationRequest {
        let mut req = cfg.to_request();
        if let Some(v) = self.capital {
            req.initial_capital = v;
        }
        if let Some(v) = self.bet {
            req.bet_size = v;
        }
        if let Some(v) = self.loss_pct {
            req.loss_probability_pct = v;
            req.win_probability_pct = Some(complement_probability(v).1);
        }
        if let Some(v) = self.rounds {
            req.rounds = v;
        }
        if let Some(v) = self.players {
            req.players = v;
        }
        if self.seed.is_some() {
            req.seed = self.seed;
        }
        req
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args = Args::parse();
    init_logging();

    let cfg = AppConfig::load_or_default(&args.config)?;

    if args.serve || cfg.server.enabled {
        let port = args.port.unwrap_or(cfg.server.port);
        let state = Arc::new(DashboardState::new(cfg));
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received.");
        };
        return dashboard::serve(state, port, shutdown).await;
    }

    run_once(&args, &cfg)
}

/// Simulate and print a single run.
fn run_once(args: &Args, cfg: &AppConfig) -> Result<()> {
    let run = engine::simulate_request(&args.request(&cfg.simulation), &cfg.limits)
        .context("Simulation failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&run).context("Failed to serialise simulation run")?
        );
    } else {
        println!("{run}");
    }

    if let Some(path) = &args.output {
        report::write_json(&run, path)?;
        info!(path = %path.display(), "Run written");
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wagersim=info"));

    let json_logging = std::env::var("WAGERSIM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
