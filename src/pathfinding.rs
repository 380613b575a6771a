//! Breadth-first searches over the board's passability graph.
//!
//! Both searches only ever step into passable cells and keep a visited set
//! keyed by coordinate, so every cell is expanded at most once.

use std::collections::{HashSet, VecDeque};

use crate::board::{Board, Cell};
use crate::types::Coord;

/// Result of [`flood_fill`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodFill {
    /// Cells reachable from the start, not counting the start itself
    pub reachable: usize,
    pub target_reached: bool,
}

/// Shortest-path search for the first cell matching `predicate`.
///
/// The start cell is tested first (distance 0). Ties at equal distance go to
/// whichever cell the BFS visits first, which follows the board's neighbour
/// order. Returns `None` if no reachable cell matches or `start` is off the
/// board.
pub fn find_nearest<'b, P>(board: &'b Board, start: Coord, predicate: P) -> Option<(&'b Cell, usize)>
where
    P: Fn(&Cell) -> bool,
{
    let start_cell = board.get(start)?;

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back((start_cell, 0usize));

    while let Some((cell, dist)) = queue.pop_front() {
        if predicate(cell) {
            return Some((cell, dist));
        }

        for neighbour in cell.passable_neighbours(board) {
            if visited.insert(neighbour.coord()) {
                queue.push_back((neighbour, dist + 1));
            }
        }
    }

    None
}

/// Counts cells reachable from `start` and reports whether `target` is one
/// of them. The start cell is never counted, even when a cycle leads back to
/// it, and need not itself be passable (it is usually a head).
pub fn flood_fill(board: &Board, start: Coord, target: Option<Coord>) -> FloodFill {
    let mut result = FloodFill {
        reachable: 0,
        target_reached: false,
    };
    if !board.in_bounds(start) {
        return result;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(coord) = queue.pop_front() {
        for neighbour in board.passable_neighbours(coord) {
            let next = neighbour.coord();
            if visited.insert(next) {
                result.reachable += 1;
                if target == Some(next) {
                    result.target_reached = true;
                }
                queue.push_back(next);
            }
        }
    }

    result
}
