use crate::{Direction, SessionStats};
use serde::{Deserialize, Serialize};

/// Board side length.
pub const GRID_SIZE: usize = 4;

/// The 4×4 board; `None` is an empty cell, values are powers of two.
pub type Grid = [[Option<u32>; GRID_SIZE]; GRID_SIZE];

/// State of the compound-growth tile game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileState {
    pub stats: SessionStats,
    pub grid: Grid,
    /// Count of accepted (board-changing) moves.
    pub moves: u32,
    /// Largest tile currently on the board.
    pub best_tile: u32,
    /// The grid before the last accepted move, retained for one undo.
    pub previous_grid: Option<Grid>,
    /// Cleared after a single undo until the next accepted move.
    pub can_undo: bool,
    /// Board full with no adjacent equal pair.
    pub game_over: bool,
    /// Set once any tile reaches 2048; play continues.
    pub won: bool,
    /// Number of moves that merged at least one pair.
    pub compound_periods: u32,
}

/// Actions accepted by the tile reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TileAction {
    /// Shift and merge toward a direction; a no-change shift is a mistake.
    Move { direction: Direction },
    /// Restore the previous grid; available once per accepted move.
    Undo,
    /// Rebuild a fresh board.
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip_grid() {
        let mut grid: Grid = Default::default();
        grid[0][0] = Some(2);
        grid[3][3] = Some(2048);
        let s = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&s).unwrap();
        assert_eq!(back, grid);
    }
}
