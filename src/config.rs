//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file or a partial file
//! still yields a usable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{complement_probability, SimulationRequest};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub limits: Limits,
    pub server: ServerConfig,
}

/// Default parameters for a run when none are supplied.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    pub bet_size: f64,
    pub loss_probability_pct: f64,
    pub rounds: u32,
    pub players: u32,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            bet_size: 10.0,
            loss_probability_pct: 50.0,
            rounds: 1000,
            players: 1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// The configured defaults as a request, ready for validation.
    ///
    /// The win probability is filled in as the complement of the loss
    /// probability.
    pub fn to_request(&self) -> SimulationRequest {
        let (_, win) = complement_probability(self.loss_probability_pct);
        SimulationRequest {
            initial_capital: self.initial_capital,
            bet_size: self.bet_size,
            loss_probability_pct: self.loss_probability_pct,
            win_probability_pct: Some(win),
            rounds: self.rounds,
            players: self.players,
            seed: self.seed,
        }
    }
}

/// Upper bounds applied when validating requests.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Limits {
    pub max_rounds: u32,
    pub max_players: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rounds: 10_000,
            max_players: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
