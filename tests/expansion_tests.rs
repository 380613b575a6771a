//! State expansion tests
//!
//! Cartesian products of opponent moves and their application through a
//! rules collaborator.

use portfolio_snake::board::TailVanishRule;
use portfolio_snake::error::EngineError;
use portfolio_snake::expansion::{cartesian_product, expand, move_combinations};
use portfolio_snake::rules::{RulesError, Ruleset, StandardRules};
use portfolio_snake::snapshot::{AgentState, GameSnapshot, Move};
use portfolio_snake::types::{Coord, Direction};

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

fn snapshot(width: i32, height: i32, agents: Vec<AgentState>) -> GameSnapshot {
    GameSnapshot::new(10, width, height, vec![], agents, "me", TailVanishRule::new(100, 3))
        .expect("valid snapshot")
}

struct RejectEverything;

impl Ruleset for RejectEverything {
    fn apply_moves(&self, _: &GameSnapshot, _: &[Move]) -> Result<GameSnapshot, RulesError> {
        Err(RulesError::MissingMove("ghost".to_string()))
    }
}

#[test]
fn test_cartesian_product_sizes_and_order() {
    let sets = vec![vec![1, 2], vec![10, 20, 30]];
    let combos = cartesian_product(&sets);

    assert_eq!(combos.len(), 6);
    assert_eq!(combos[0], vec![1, 10]);
    assert_eq!(combos[1], vec![1, 20], "last set varies fastest");
    assert_eq!(combos[5], vec![2, 30]);
}

#[test]
fn test_cartesian_product_of_nothing_is_one_empty_combo() {
    let combos = cartesian_product::<u8>(&[]);
    assert_eq!(combos, vec![Vec::<u8>::new()]);

    let with_empty_set = cartesian_product(&[vec![1, 2], vec![]]);
    assert!(with_empty_set.is_empty());
}

#[test]
fn test_expansion_covers_every_opponent_combination() {
    let snap = snapshot(
        7,
        7,
        vec![
            AgentState::new("me", 90, vec![c(3, 3), c(3, 2)]),
            AgentState::new("a", 90, vec![c(0, 0), c(1, 0), c(2, 0)]),
            AgentState::new("b", 90, vec![c(6, 6), c(6, 5)]),
        ],
    );

    let expected: usize = snap
        .alive_agents()
        .filter(|a| a.id() != "me")
        .map(|a| a.considered_moves(Direction::Up).len())
        .product();
    assert!(expected > 1);

    let committed = Move::new("me", Direction::Left);
    let combos = move_combinations(&snap, &committed, Direction::Up);
    assert_eq!(combos.len(), expected);
    for combo in &combos {
        assert_eq!(combo[0], committed);
        assert_eq!(combo.len(), 3);
    }

    let states = expand(&snap, &committed, &StandardRules::new(100, 1), Direction::Up)
        .expect("consistent snapshot");
    assert_eq!(states.len(), expected);
    for state in &states {
        assert_eq!(state.turn(), 11);
        assert_eq!(state.you().head(), c(2, 3));
        assert_eq!(state.you().health(), 89);
    }
}

#[test]
fn test_expansion_without_opponents_yields_one_state() {
    let snap = snapshot(5, 5, vec![AgentState::new("me", 90, vec![c(2, 2)])]);

    let states = expand(
        &snap,
        &Move::new("me", Direction::Up),
        &StandardRules::new(100, 1),
        Direction::Up,
    )
    .expect("consistent snapshot");
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].you().head(), c(2, 3));
}

#[test]
fn test_boxed_in_opponent_gets_fallback() {
    let snap = snapshot(
        3,
        3,
        vec![
            AgentState::new("me", 90, vec![c(2, 2)]),
            AgentState::new("boxed", 100, vec![c(0, 0), c(0, 1), c(1, 1), c(1, 0)]),
        ],
    );

    let combos = move_combinations(&snap, &Move::new("me", Direction::Down), Direction::Up);
    assert_eq!(combos.len(), 1);
    assert_eq!(combos[0][1], Move::new("boxed", Direction::Up));
}

#[test]
fn test_eliminated_opponents_are_not_expanded() {
    let mut dead = AgentState::new("dead", 0, vec![c(0, 0), c(0, 1)]);
    dead.eliminated = Some(portfolio_snake::snapshot::EliminationCause::OutOfHealth);
    let snap = snapshot(5, 5, vec![AgentState::new("me", 90, vec![c(2, 2)]), dead]);

    let combos = move_combinations(&snap, &Move::new("me", Direction::Up), Direction::Up);
    assert_eq!(combos, vec![vec![Move::new("me", Direction::Up)]]);
}

#[test]
fn test_rules_rejection_surfaces_as_error() {
    let snap = snapshot(
        5,
        5,
        vec![
            AgentState::new("me", 90, vec![c(2, 2)]),
            AgentState::new("other", 90, vec![c(0, 0)]),
        ],
    );

    let result = expand(&snap, &Move::new("me", Direction::Up), &RejectEverything, Direction::Up);
    assert!(matches!(
        result,
        Err(EngineError::Rules(RulesError::MissingMove(id))) if id == "ghost"
    ));
}
