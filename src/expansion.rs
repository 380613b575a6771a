//! One-ply state expansion.
//!
//! For a committed move of the controlled snake, every combination of the
//! other living snakes' considered moves is applied through the `Ruleset`.
//! The number of states is the product of those move-set sizes (at most
//! 4^opponents); no combination is ever dropped.

use rayon::prelude::*;

use crate::error::EngineError;
use crate::rules::Ruleset;
use crate::snapshot::{GameSnapshot, Move};
use crate::types::Direction;

/// Every way of picking one element from each set, in odometer order with
/// the last set varying fastest. No sets yields a single empty combination.
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    sets.iter().fold(vec![Vec::new()], |combos, set| {
        combos
            .iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut combo = prefix.clone();
                    combo.push(item.clone());
                    combo
                })
            })
            .collect()
    })
}

/// Full move sets for every living snake with `committed` fixed
pub fn move_combinations(
    snapshot: &GameSnapshot,
    committed: &Move,
    fallback: Direction,
) -> Vec<Vec<Move>> {
    let opponent_moves: Vec<Vec<Move>> = snapshot
        .alive_agents()
        .filter(|agent| agent.id() != committed.agent_id)
        .map(|agent| agent.considered_moves(fallback))
        .collect();

    cartesian_product(&opponent_moves)
        .into_iter()
        .map(|mut combo| {
            combo.insert(0, committed.clone());
            combo
        })
        .collect()
}

/// Applies every move combination, failing on the first rejected set.
/// A rejected set means the input state was already inconsistent.
pub fn expand(
    snapshot: &GameSnapshot,
    committed: &Move,
    rules: &dyn Ruleset,
    fallback: Direction,
) -> Result<Vec<GameSnapshot>, EngineError> {
    move_combinations(snapshot, committed, fallback)
        .par_iter()
        .map(|moves| rules.apply_moves(snapshot, moves).map_err(EngineError::from))
        .collect()
}
