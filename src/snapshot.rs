//! Immutable per-turn views of the game.
//!
//! A `GameSnapshot` is never edited. Later states come from a `Ruleset`
//! producing a fresh snapshot via [`GameSnapshot::next_turn`]. The grid for a
//! snapshot is built lazily once and then shared read-only by every
//! evaluator.

use std::sync::OnceLock;

use crate::board::{Board, TailVanishRule};
use crate::error::EngineError;
use crate::rules::RulesError;
use crate::types::{Battlesnake, Coord, Direction, GameState};

/// Largest width or height a snapshot accepts
pub const MAX_BOARD_SIDE: i32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EliminationCause {
    OutOfHealth,
    WallCollision,
    SelfCollision,
    BodyCollision,
    HeadToHeadCollision,
}

/// One agent's move for a turn, in absolute board directions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub agent_id: String,
    pub direction: Direction,
}

impl Move {
    pub fn new(agent_id: impl Into<String>, direction: Direction) -> Self {
        Move {
            agent_id: agent_id.into(),
            direction,
        }
    }
}

/// Raw per-agent facts as stored in a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub id: String,
    pub name: String,
    pub health: i32,
    /// Head first, tail last
    pub body: Vec<Coord>,
    pub shout: Option<String>,
    pub eliminated: Option<EliminationCause>,
}

impl AgentState {
    pub fn new(id: impl Into<String>, health: i32, body: Vec<Coord>) -> Self {
        let id = id.into();
        AgentState {
            name: id.clone(),
            id,
            health,
            body,
            shout: None,
            eliminated: None,
        }
    }

    pub fn from_battlesnake(snake: &Battlesnake) -> Self {
        AgentState {
            id: snake.id.clone(),
            name: snake.name.clone(),
            health: snake.health,
            body: snake.body.clone(),
            shout: snake.shout.clone().filter(|s| !s.is_empty()),
            eliminated: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.eliminated.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct GameSnapshot {
    turn: u32,
    width: i32,
    height: i32,
    food: Vec<Coord>,
    agents: Vec<AgentState>,
    you: usize,
    tail_rule: TailVanishRule,
    board: OnceLock<Board>,
}

impl GameSnapshot {
    /// Builds a snapshot, rejecting absurd dimensions, a missing controlled
    /// agent or an empty body
    pub fn new(
        turn: u32,
        width: i32,
        height: i32,
        food: Vec<Coord>,
        agents: Vec<AgentState>,
        you_id: &str,
        tail_rule: TailVanishRule,
    ) -> Result<Self, EngineError> {
        let valid_side = |side: i32| (1..=MAX_BOARD_SIDE).contains(&side);
        if !valid_side(width) || !valid_side(height) {
            return Err(EngineError::InvalidDimensions {
                width,
                height,
                max: MAX_BOARD_SIDE,
            });
        }

        let you = agents
            .iter()
            .position(|a| a.id == you_id)
            .ok_or_else(|| EngineError::MissingAgent(you_id.to_string()))?;

        if let Some(empty) = agents.iter().find(|a| a.body.is_empty()) {
            return Err(EngineError::EmptyBody(empty.id.clone()));
        }

        Ok(GameSnapshot {
            turn,
            width,
            height,
            food,
            agents,
            you,
            tail_rule,
            board: OnceLock::new(),
        })
    }

    /// Builds the snapshot for a /move request
    pub fn from_request(state: &GameState, tail_rule: TailVanishRule) -> Result<Self, EngineError> {
        let agents = state
            .board
            .snakes
            .iter()
            .map(AgentState::from_battlesnake)
            .collect();

        GameSnapshot::new(
            state.turn,
            state.board.width,
            state.board.height,
            state.board.food.clone(),
            agents,
            &state.you.id,
            tail_rule,
        )
    }

    /// Successor state one turn later with the same dimensions and controlled agent
    pub fn next_turn(
        &self,
        food: Vec<Coord>,
        agents: Vec<AgentState>,
    ) -> Result<GameSnapshot, RulesError> {
        let you_id = &self.agents[self.you].id;
        let you = agents
            .iter()
            .position(|a| &a.id == you_id)
            .ok_or_else(|| RulesError::UnknownAgent(you_id.clone()))?;

        Ok(GameSnapshot {
            turn: self.turn + 1,
            width: self.width,
            height: self.height,
            food,
            agents,
            you,
            tail_rule: self.tail_rule,
            board: OnceLock::new(),
        })
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    pub fn tail_rule(&self) -> TailVanishRule {
        self.tail_rule
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Raw agent records, in board order
    pub fn agent_states(&self) -> &[AgentState] {
        &self.agents
    }

    /// Every agent, alive or eliminated
    pub fn agents(&self) -> impl Iterator<Item = AgentSnapshot<'_>> {
        (0..self.agents.len()).map(move |index| AgentSnapshot { game: self, index })
    }

    pub fn alive_agents(&self) -> impl Iterator<Item = AgentSnapshot<'_>> {
        self.agents().filter(|a| a.alive())
    }

    pub fn agent(&self, id: &str) -> Option<AgentSnapshot<'_>> {
        self.agents().find(|a| a.id() == id)
    }

    /// The agent this engine is choosing moves for
    pub fn you(&self) -> AgentSnapshot<'_> {
        AgentSnapshot {
            game: self,
            index: self.you,
        }
    }

    pub fn board(&self) -> &Board {
        self.board.get_or_init(|| Board::build(self))
    }
}

/// Read-only view of one agent inside a snapshot
#[derive(Debug, Clone, Copy)]
pub struct AgentSnapshot<'a> {
    game: &'a GameSnapshot,
    index: usize,
}

impl<'a> AgentSnapshot<'a> {
    fn state(&self) -> &'a AgentState {
        &self.game.agents[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &'a str {
        &self.state().id
    }

    pub fn name(&self) -> &'a str {
        &self.state().name
    }

    pub fn alive(&self) -> bool {
        self.state().is_alive()
    }

    pub fn elimination_cause(&self) -> Option<EliminationCause> {
        self.state().eliminated
    }

    /// 0 once eliminated
    pub fn health(&self) -> i32 {
        if self.alive() {
            self.state().health
        } else {
            0
        }
    }

    pub fn body(&self) -> &'a [Coord] {
        &self.state().body
    }

    pub fn head(&self) -> Coord {
        self.state().body[0]
    }

    pub fn tail(&self) -> Coord {
        let body = self.body();
        body[body.len() - 1]
    }

    pub fn length(&self) -> usize {
        self.state().body.len()
    }

    pub fn last_shout(&self) -> Option<&'a str> {
        self.state().shout.as_deref()
    }

    /// Directions whose destination is in bounds and passable on the current
    /// board. Never empty: a boxed-in agent is handed `fallback` so every move
    /// set stays complete.
    pub fn considered_moves(&self, fallback: Direction) -> Vec<Move> {
        let board = self.game.board();
        let head = self.head();

        let moves: Vec<Move> = Direction::all()
            .into_iter()
            .filter(|dir| board.is_passable(dir.apply(&head)))
            .map(|dir| Move::new(self.id(), dir))
            .collect();

        if moves.is_empty() {
            vec![Move::new(self.id(), fallback)]
        } else {
            moves
        }
    }
}
