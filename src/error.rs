//! # Errors
//!
//! Two things can go wrong: an agent is built from a configuration that cannot
//! produce a meaningful simulation, or the agent lands exactly on an obstacle
//! centre where the repulsive term has no direction.

use thiserror::Error;

/// Reasons a configuration is refused at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("attractive gain must be positive and finite, got {0}")]
    AttractiveGain(f64),
    #[error("repulsive gain must be positive and finite, got {0}")]
    RepulsiveGain(f64),
    #[error("influence radius must be positive and finite, got {0}")]
    InfluenceRadius(f64),
    #[error("step size must be positive and finite, got {0}")]
    StepSize(f64),
    #[error("obstacle {index} has invalid {field} {value}")]
    ObstacleRadius {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("obstacle {index} has a non-finite centre")]
    ObstacleCenter { index: usize },
    #[error("start and goal coincide")]
    DegenerateGoal,
    #[error("{which} ({x:.3}, {y:.3}) lies outside the world bounds")]
    OutOfBounds { which: &'static str, x: f64, y: f64 },
    #[error("world bounds are empty or non-finite")]
    Bounds,
    #[error("{field} must be positive and finite, got {value}")]
    Threshold { field: &'static str, value: f64 },
    #[error("{0} must be at least one tick")]
    TickCount(&'static str),
    #[error("escape step boost must be finite and at least 1.0, got {0}")]
    StepBoost(f64),
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// The agent coincides with the centre of `obstacle`.
    #[error("agent coincides with the centre of obstacle {obstacle}")]
    DegenerateDistance { obstacle: usize },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavigationError>;
