// Built-in heuristics and the name registry used to assemble a portfolio
//
// Every heuristic scores the controlled snake in a hypothetical next state.
// An eliminated snake scores 0 everywhere.

use crate::board::{Cell, CellKind};
use crate::config::Config;
use crate::error::EngineError;
use crate::pathfinding::{find_nearest, flood_fill};
use crate::portfolio::{HeuristicFn, Portfolio, WeightedHeuristic};
use crate::snapshot::GameSnapshot;

/// Ceiling shared by the built-in heuristics
const MAX_SCORE: f64 = 100.0;

/// Names accepted in `[[portfolio.heuristics]]`
pub const BUILTIN_NAMES: [&str; 3] = ["health", "food", "space"];

/// Current health of the controlled snake
pub fn health_score(snapshot: &GameSnapshot) -> f64 {
    snapshot.you().health() as f64
}

/// Rewards being close to reachable food, unless already at full health
pub fn food_score(snapshot: &GameSnapshot, max_health: i32) -> f64 {
    let you = snapshot.you();
    if !you.alive() {
        return 0.0;
    }
    if you.health() >= max_health {
        return MAX_SCORE;
    }

    let is_food = |cell: &Cell| cell.kind() == CellKind::Food;
    match find_nearest(snapshot.board(), you.head(), is_food) {
        Some((_, dist)) => MAX_SCORE / dist.max(1) as f64,
        None => 0.0,
    }
}

/// Full marks when the snake can reach its own tail or has at least its own
/// length of room; otherwise the number of reachable cells
pub fn space_score(snapshot: &GameSnapshot) -> f64 {
    let you = snapshot.you();
    if !you.alive() {
        return 0.0;
    }

    let fill = flood_fill(snapshot.board(), you.head(), Some(you.tail()));
    if fill.target_reached || fill.reachable >= you.length() {
        MAX_SCORE
    } else {
        fill.reachable as f64
    }
}

/// Looks up a built-in heuristic by name
pub fn by_name(name: &str, config: &Config) -> Option<HeuristicFn> {
    let max_health = config.game_rules.max_health;
    let f: HeuristicFn = match name {
        "health" => Box::new(health_score),
        "food" => Box::new(move |s: &GameSnapshot| food_score(s, max_health)),
        "space" => Box::new(space_score),
        _ => return None,
    };
    Some(f)
}

/// Assembles the configured portfolio, in configuration order
pub fn portfolio_from_config(config: &Config) -> Result<Portfolio, EngineError> {
    let heuristics = config
        .portfolio
        .heuristics
        .iter()
        .map(|entry| {
            let f = by_name(&entry.name, config)
                .ok_or_else(|| EngineError::UnknownHeuristic(entry.name.clone()))?;
            Ok(WeightedHeuristic::new(entry.weight, entry.name.clone(), f))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(Portfolio::new(heuristics))
}
