//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`
//! and is read-only: every simulation builds its own random source.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine;
use crate::report::ChartData;
use crate::types::{
    AggregateResult, SimError, SimulationParameters, SimulationRequest, SimulationRun, Trajectory,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub config: AppConfig,
}

impl DashboardState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Per-player outcome; the full series travels once, in the chart.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectorySummary {
    pub wins: u32,
    pub losses: u32,
    pub final_capital: Option<f64>,
    pub min_capital: Option<f64>,
}

impl From<&Trajectory> for TrajectorySummary {
    fn from(t: &Trajectory) -> Self {
        Self {
            wins: t.wins,
            losses: t.losses,
            final_capital: t.final_capital(),
            min_capital: t.min_capital(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub params: SimulationParameters,
    pub players: u32,
    pub seed: Option<u64>,
    pub trajectories: Vec<TrajectorySummary>,
    pub aggregate: AggregateResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub run: RunSummary,
    pub chart: ChartData,
}

impl From<SimulationRun> for SimulateResponse {
    fn from(run: SimulationRun) -> Self {
        let chart = ChartData::from_run(&run);
        Self {
            run: RunSummary {
                run_id: run.run_id,
                generated_at: run.generated_at,
                params: run.params,
                players: run.players,
                seed: run.seed,
                trajectories: run.trajectories.iter().map(TrajectorySummary::from).collect(),
                aggregate: run.aggregate,
            },
            chart,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure modes of the simulate endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error("Simulation task failed: {0}")]
    Task(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Simulation(SimError::InvalidParameter(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Simulation(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/defaults
pub async fn get_defaults(State(state): State<AppState>) -> Json<SimulationRequest> {
    Json(state.config.simulation.to_request())
}

/// POST /api/simulate
pub async fn post_simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let limits = state.config.limits;
    let run = tokio::task::spawn_blocking(move || engine::simulate_request(&request, &limits))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(|e| {
            if let SimError::InvalidParameter(reason) = &e {
                warn!(error = %reason, "Rejected simulation request");
            }
            e
        })?;

    info!(run_id = %run.run_id, players = run.players, "Simulation served");
    Ok(Json(SimulateResponse::from(run)))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
