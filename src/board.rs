//! Grid model: a dense, immutable classification of every cell of a snapshot.
//!
//! Cells are a closed sum type. Passability is the only thing search cares
//! about: empty and food cells are open, heads and bodies are walls, and a
//! tail is open only when its owner will drag it away before the next move
//! lands.

use crate::config::Config;
use crate::snapshot::GameSnapshot;
use crate::types::{Coord, Direction};

/// Decides whether a tail segment is vacated on the next turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailVanishRule {
    pub max_health: i32,
    /// Snakes start with stacked segments; tails do not retreat before this turn
    pub grace_turns: u32,
}

impl TailVanishRule {
    pub fn new(max_health: i32, grace_turns: u32) -> Self {
        TailVanishRule {
            max_health,
            grace_turns,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        TailVanishRule::new(
            config.game_rules.max_health,
            config.board.tail_vanish_grace_turns,
        )
    }

    /// A snake at full health has just eaten and keeps its tail in place
    pub fn will_vanish(&self, health: i32, turn: u32) -> bool {
        health < self.max_health && turn >= self.grace_turns
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Food,
    SnakeHead,
    SnakeBody,
    SnakeTail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakePart {
    Head,
    Body,
    Tail { will_vanish: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty {
        coord: Coord,
    },
    Food {
        coord: Coord,
    },
    Snake {
        coord: Coord,
        /// Index of the owning agent in the snapshot's agent list
        owner: usize,
        part: SnakePart,
    },
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Empty { .. } => CellKind::Empty,
            Cell::Food { .. } => CellKind::Food,
            Cell::Snake { part, .. } => match part {
                SnakePart::Head => CellKind::SnakeHead,
                SnakePart::Body => CellKind::SnakeBody,
                SnakePart::Tail { .. } => CellKind::SnakeTail,
            },
        }
    }

    pub fn coord(&self) -> Coord {
        match *self {
            Cell::Empty { coord } | Cell::Food { coord } | Cell::Snake { coord, .. } => coord,
        }
    }

    pub fn is_passable(&self) -> bool {
        match self {
            Cell::Empty { .. } | Cell::Food { .. } => true,
            Cell::Snake { part, .. } => matches!(part, SnakePart::Tail { will_vanish: true }),
        }
    }

    pub fn owner(&self) -> Option<usize> {
        match self {
            Cell::Snake { owner, .. } => Some(*owner),
            _ => None,
        }
    }

    pub fn passable_neighbours<'b>(&self, board: &'b Board) -> impl Iterator<Item = &'b Cell> {
        board.passable_neighbours(self.coord())
    }
}

/// Row-major grid, one cell per coordinate
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds the grid for a snapshot. Only alive agents occupy cells.
    ///
    /// Segments are laid down tails first, then bodies, then heads, so a
    /// stacked coordinate takes the strongest kind and a single-segment
    /// snake is a head only.
    pub fn build(snapshot: &GameSnapshot) -> Board {
        let width = snapshot.width().max(0);
        let height = snapshot.height().max(0);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::Empty {
                    coord: Coord { x, y },
                });
            }
        }

        let mut board = Board {
            width,
            height,
            cells,
        };

        for &coord in snapshot.food() {
            board.set(Cell::Food { coord });
        }

        let rule = snapshot.tail_rule();
        let turn = snapshot.turn();
        let alive: Vec<_> = snapshot.alive_agents().collect();

        for agent in &alive {
            let body = agent.body();
            if body.len() > 1 {
                board.set(Cell::Snake {
                    coord: body[body.len() - 1],
                    owner: agent.index(),
                    part: SnakePart::Tail {
                        will_vanish: rule.will_vanish(agent.health(), turn),
                    },
                });
            }
        }

        for agent in &alive {
            let body = agent.body();
            if body.len() > 2 {
                for &coord in &body[1..body.len() - 1] {
                    board.set(Cell::Snake {
                        coord,
                        owner: agent.index(),
                        part: SnakePart::Body,
                    });
                }
            }
        }

        for agent in &alive {
            board.set(Cell::Snake {
                coord: agent.head(),
                owner: agent.index(),
                part: SnakePart::Head,
            });
        }

        board
    }

    fn set(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell.coord()) {
            self.cells[idx] = cell;
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    /// Out-of-bounds coordinates are never passable
    pub fn is_passable(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_passable)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// In-bounds 4-neighbours in up, down, left, right order
    pub fn neighbours(&self, coord: Coord) -> impl Iterator<Item = &Cell> {
        Direction::all()
            .into_iter()
            .filter_map(move |dir| self.get(dir.apply(&coord)))
    }

    pub fn passable_neighbours(&self, coord: Coord) -> impl Iterator<Item = &Cell> {
        self.neighbours(coord).filter(|cell| cell.is_passable())
    }
}
