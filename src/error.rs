// Error taxonomy for the decision engine
//
// Only input-integrity failures surface here. Degenerate choices (no legal
// move) and the single-move shortcut are handled in-line and never error.

use thiserror::Error;

use crate::rules::RulesError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("controlled snake '{0}' is not on the board")]
    MissingAgent(String),

    #[error("board dimensions {width}x{height} are outside 1..={max}")]
    InvalidDimensions { width: i32, height: i32, max: i32 },

    #[error("snake '{0}' has an empty body")]
    EmptyBody(String),

    #[error("rules engine rejected move set: {0}")]
    Rules(#[from] RulesError),

    #[error("temperature must be > 0, got {0}")]
    InvalidTemperature(f64),

    #[error("portfolio has no positive total weight")]
    EmptyPortfolio,

    #[error("unknown heuristic '{0}'")]
    UnknownHeuristic(String),

    #[error("move probabilities are not a valid distribution: {0}")]
    InvalidDistribution(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("decision task failed: {0}")]
    Task(String),
}
