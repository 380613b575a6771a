//! Move-selection engine.
//!
//! One decision runs in four stages:
//! 1. collect the controlled snake's considered moves (a lone move is
//!    returned at once, with no expansion or scoring),
//! 2. expand each move into every next state the opponents can produce,
//! 3. score every state with every heuristic, averaging per (heuristic, move),
//! 4. fold the weighted averages into one normalized score per move, turn
//!    those into a temperature softmax and sample.
//!
//! Stages 1-4 up to the softmax are deterministic. Sampling draws from an
//! injected RNG. All fan-out runs on the agent's own rayon pool, so the
//! number of worker threads stays fixed however large the branching factor.

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AgentConfig, Config};
use crate::error::EngineError;
use crate::expansion::expand;
use crate::heuristics::portfolio_from_config;
use crate::portfolio::{Portfolio, WeightedHeuristic};
use crate::rules::{Ruleset, StandardRules};
use crate::sampling::{sample_from_weights, softmax_with_temperature};
use crate::snapshot::{GameSnapshot, Move};
use crate::types::{Direction, MoveResponse};

/// A heuristic's mean score for one move, before and after weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicScore {
    pub raw: f64,
    pub weighted: f64,
}

/// Deterministic part of a decision
#[derive(Debug, Clone)]
pub struct MoveEvaluation {
    pub moves: Vec<Direction>,
    /// Indexed `[heuristic][move]`, heuristics in portfolio order
    pub heuristic_scores: Vec<Vec<HeuristicScore>>,
    /// Weighted sum per move divided by the portfolio's total weight
    pub normalized: Vec<f64>,
}

/// Outcome of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDecision {
    pub direction: Direction,
    pub shout: String,
    /// Sampling distribution over the considered moves; a lone move has probability 1
    pub probabilities: Vec<(Direction, f64)>,
}

impl MoveDecision {
    fn new(direction: Direction, probabilities: Vec<(Direction, f64)>) -> Self {
        MoveDecision {
            direction,
            shout: format!("I'm moving {}", direction),
            probabilities,
        }
    }

    pub fn to_response(&self) -> MoveResponse {
        MoveResponse {
            direction: self.direction,
            shout: self.shout.clone(),
        }
    }
}

pub struct SnakeAgent {
    portfolio: Portfolio,
    rules: Arc<dyn Ruleset>,
    settings: AgentConfig,
    pool: rayon::ThreadPool,
}

impl SnakeAgent {
    /// Creates an agent, validating temperature and portfolio weights
    ///
    /// # Arguments
    /// * `portfolio` - Heuristics to score next states with
    /// * `rules` - Rules collaborator used for expansion
    /// * `settings` - Temperature, default move and stats logging
    /// * `worker_threads` - Pool size; 0 lets rayon choose
    pub fn new(
        portfolio: Portfolio,
        rules: Arc<dyn Ruleset>,
        settings: AgentConfig,
        worker_threads: usize,
    ) -> Result<Self, EngineError> {
        if !(settings.temperature > 0.0) || !settings.temperature.is_finite() {
            return Err(EngineError::InvalidTemperature(settings.temperature));
        }
        if portfolio.is_empty() || !(portfolio.total_weight() > 0.0) {
            return Err(EngineError::EmptyPortfolio);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|i| format!("snake-eval-{}", i))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

        Ok(SnakeAgent {
            portfolio,
            rules,
            settings,
            pool,
        })
    }

    /// Builds an agent with the configured portfolio and standard rules
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        SnakeAgent::new(
            portfolio_from_config(config)?,
            Arc::new(StandardRules::from_config(config)),
            config.agent.clone(),
            config.engine.worker_threads,
        )
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Chooses a move using the thread-local RNG
    pub fn choose_move(&self, snapshot: &GameSnapshot) -> Result<MoveDecision, EngineError> {
        self.choose_move_with_rng(snapshot, &mut rand::rng())
    }

    /// Chooses a move, drawing the final sample from `rng`
    pub fn choose_move_with_rng<R: Rng + ?Sized>(
        &self,
        snapshot: &GameSnapshot,
        rng: &mut R,
    ) -> Result<MoveDecision, EngineError> {
        let start_time = Instant::now();
        let decision = self.decide(snapshot, rng);

        if self.settings.log_performance_stats {
            self.portfolio.log_performance_stats();
        }
        if let Ok(d) = &decision {
            info!(
                "Turn {}: Chose {} ({}ms)",
                snapshot.turn(),
                d.direction,
                start_time.elapsed().as_millis()
            );
        }

        decision
    }

    fn decide<R: Rng + ?Sized>(
        &self,
        snapshot: &GameSnapshot,
        rng: &mut R,
    ) -> Result<MoveDecision, EngineError> {
        let moves: Vec<Direction> = snapshot
            .you()
            .considered_moves(self.settings.default_move)
            .into_iter()
            .map(|m| m.direction)
            .collect();

        info!(
            "### Start Turn {}: Considered Moves = {}",
            snapshot.turn(),
            join_moves(&moves)
        );

        if let [only] = moves.as_slice() {
            return Ok(MoveDecision::new(*only, vec![(*only, 1.0)]));
        }

        let evaluation = self.evaluate_moves(snapshot, &moves)?;
        let probs = softmax_with_temperature(&evaluation.normalized, self.settings.temperature);

        info!(
            "### {:>36}: {}",
            "Normalized Scores",
            format_per_move(&moves, &evaluation.normalized, |v| format!("{:6.1}", v))
        );
        info!(
            "### {:>36}: {}",
            "Move Probabilities",
            format_per_move(&moves, &probs, |p| format!("{:5.1}%", p * 100.0))
        );

        let chosen = moves[sample_from_weights(&probs, rng)?];
        Ok(MoveDecision::new(
            chosen,
            moves.iter().copied().zip(probs).collect(),
        ))
    }

    /// Expands and scores `moves` for the controlled snake. Deterministic for
    /// deterministic heuristics.
    pub fn evaluate_moves(
        &self,
        snapshot: &GameSnapshot,
        moves: &[Direction],
    ) -> Result<MoveEvaluation, EngineError> {
        let you_id = snapshot.you().id();
        let fallback = self.settings.default_move;

        self.pool.install(|| -> Result<MoveEvaluation, EngineError> {
            let next_states: Vec<Vec<GameSnapshot>> = moves
                .par_iter()
                .map(|&dir| expand(snapshot, &Move::new(you_id, dir), self.rules.as_ref(), fallback))
                .collect::<Result<_, _>>()?;

            let heuristic_scores: Vec<Vec<HeuristicScore>> = self
                .portfolio
                .heuristics()
                .par_iter()
                .map(|h| weighted_scores_for_heuristic(h, &next_states))
                .collect();

            for (h, scores) in self.portfolio.heuristics().iter().zip(&heuristic_scores) {
                let raw: Vec<f64> = scores.iter().map(|s| s.raw).collect();
                debug!(
                    "MoveScores for {:>25}: {}",
                    h.name_and_weight(),
                    format_per_move(moves, &raw, |v| format!("{:6.1}", v))
                );
            }

            let total_weight = self.portfolio.total_weight();
            let normalized = (0..moves.len())
                .map(|i| {
                    heuristic_scores
                        .iter()
                        .map(|scores| scores[i].weighted)
                        .sum::<f64>()
                        / total_weight
                })
                .collect();

            Ok(MoveEvaluation {
                moves: moves.to_vec(),
                heuristic_scores,
                normalized,
            })
        })
    }
}

/// Mean raw score of `heuristic` over each move's next states
fn weighted_scores_for_heuristic(
    heuristic: &WeightedHeuristic,
    next_states: &[Vec<GameSnapshot>],
) -> Vec<HeuristicScore> {
    next_states
        .par_iter()
        .map(|states| {
            let scores: Vec<f64> = states.par_iter().map(|s| heuristic.evaluate(s)).collect();
            let raw = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            HeuristicScore {
                raw,
                weighted: raw * heuristic.weight(),
            }
        })
        .collect()
}

fn join_moves(moves: &[Direction]) -> String {
    moves
        .iter()
        .map(Direction::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_per_move<F>(moves: &[Direction], values: &[f64], fmt: F) -> String
where
    F: Fn(f64) -> String,
{
    moves
        .iter()
        .zip(values)
        .map(|(m, v)| format!("{}={}", m, fmt(*v)))
        .collect::<Vec<_>>()
        .join(", ")
}
