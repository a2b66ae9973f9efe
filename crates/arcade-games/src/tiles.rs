//! Compound tiles: a 2048 variant teaching compound growth.

use arcade_core::{
    ActionPayload, Controls, Direction, Game, GameEvent, GameId, GameMeta, GameState, GameView,
    Grid, LearningObjective, SessionStats, TileAction, TileState, GRID_SIZE,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Tile value that flags the session as won.
pub const WINNING_TILE: u32 = 2048;
/// Probability that a spawned tile is a 2 (otherwise a 4).
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Compress one line toward its head, merging adjacent equal pairs once.
///
/// Returns the compacted line and the score gained from merges.
fn compress_merge(line: [Option<u32>; GRID_SIZE]) -> ([Option<u32>; GRID_SIZE], u32) {
    let values: Vec<u32> = line.iter().flatten().copied().collect();
    let mut out = [None; GRID_SIZE];
    let mut gained = 0;
    let mut read = 0;
    let mut write = 0;
    while read < values.len() {
        if read + 1 < values.len() && values[read] == values[read + 1] {
            let merged = values[read] * 2;
            gained += merged;
            out[write] = Some(merged);
            read += 2;
        } else {
            out[write] = Some(values[read]);
            read += 1;
        }
        write += 1;
    }
    (out, gained)
}

/// Shift and merge the whole grid toward a direction.
///
/// Returns the next grid, whether anything changed, and the merge score.
pub fn shift(grid: &Grid, direction: Direction) -> (Grid, bool, u32) {
    let mut next = *grid;
    let mut gained = 0;
    match direction {
        Direction::Left => {
            for row in next.iter_mut() {
                let (line, score) = compress_merge(*row);
                *row = line;
                gained += score;
            }
        }
        Direction::Right => {
            for row in next.iter_mut() {
                let mut line = *row;
                line.reverse();
                let (mut merged, score) = compress_merge(line);
                merged.reverse();
                *row = merged;
                gained += score;
            }
        }
        Direction::Up => {
            for col in 0..GRID_SIZE {
                let mut line = [None; GRID_SIZE];
                for row in 0..GRID_SIZE {
                    line[row] = next[row][col];
                }
                let (merged, score) = compress_merge(line);
                for row in 0..GRID_SIZE {
                    next[row][col] = merged[row];
                }
                gained += score;
            }
        }
        Direction::Down => {
            for col in 0..GRID_SIZE {
                let mut line = [None; GRID_SIZE];
                for row in 0..GRID_SIZE {
                    line[row] = next[GRID_SIZE - 1 - row][col];
                }
                let (merged, score) = compress_merge(line);
                for row in 0..GRID_SIZE {
                    next[GRID_SIZE - 1 - row][col] = merged[row];
                }
                gained += score;
            }
        }
    }
    let moved = next != *grid;
    (next, moved, gained)
}

/// Spawn one tile (2 w.p. 0.9, else 4) into a uniformly random empty cell.
///
/// Returns false when the board is full.
pub fn spawn_tile(grid: &mut Grid, rng: &mut ChaCha8Rng) -> bool {
    let empties: Vec<(usize, usize)> = (0..GRID_SIZE)
        .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| grid[r][c].is_none())
        .collect();
    if empties.is_empty() {
        return false;
    }
    let (row, col) = empties[rng.gen_range(0..empties.len())];
    let value = if rng.gen::<f64>() < SPAWN_TWO_PROBABILITY {
        2
    } else {
        4
    };
    grid[row][col] = Some(value);
    true
}

/// Board full with no adjacent equal pair in any direction.
pub fn is_stuck(grid: &Grid) -> bool {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let Some(value) = grid[row][col] else {
                return false;
            };
            if row + 1 < GRID_SIZE && grid[row + 1][col] == Some(value) {
                return false;
            }
            if col + 1 < GRID_SIZE && grid[row][col + 1] == Some(value) {
                return false;
            }
        }
    }
    true
}

/// Largest tile on the board; 0 for an empty board.
pub fn best_tile(grid: &Grid) -> u32 {
    grid.iter()
        .flat_map(|row| row.iter().flatten())
        .copied()
        .max()
        .unwrap_or(0)
}

/// Sum of all tile values, used by the conservation property.
pub fn tile_sum(grid: &Grid) -> u64 {
    grid.iter()
        .flat_map(|row| row.iter().flatten())
        .map(|&v| v as u64)
        .sum()
}

fn initial_state(rng: &mut ChaCha8Rng) -> TileState {
    let mut grid: Grid = Default::default();
    spawn_tile(&mut grid, rng);
    spawn_tile(&mut grid, rng);
    TileState {
        stats: SessionStats::new(),
        best_tile: best_tile(&grid),
        grid,
        moves: 0,
        previous_grid: None,
        can_undo: false,
        game_over: false,
        won: false,
        compound_periods: 0,
    }
}

fn apply(mut s: TileState, action: TileAction, rng: &mut ChaCha8Rng) -> TileState {
    match action {
        TileAction::Move { direction } => {
            if s.game_over {
                return s;
            }
            let (mut next, moved, gained) = shift(&s.grid, direction);
            if !moved {
                // Wasted input, not a legal move.
                s.stats.mistakes += 1;
                return s;
            }
            spawn_tile(&mut next, rng);
            s.previous_grid = Some(s.grid);
            s.grid = next;
            s.stats.score += gained;
            s.moves += 1;
            s.best_tile = best_tile(&s.grid);
            s.can_undo = true;
            s.game_over = is_stuck(&s.grid);
            if gained > 0 {
                s.compound_periods += 1;
            }
            if !s.won && s.best_tile >= WINNING_TILE {
                debug!(best = s.best_tile, "winning tile reached");
                s.won = true;
            }
            s
        }
        TileAction::Undo => {
            if !s.can_undo {
                return s;
            }
            let Some(previous) = s.previous_grid else {
                return s;
            };
            s.grid = previous;
            s.moves = s.moves.saturating_sub(1);
            s.previous_grid = None;
            s.can_undo = false;
            s.game_over = false;
            s
        }
        TileAction::Restart => initial_state(rng),
    }
}

fn reduce(s: TileState, event: GameEvent, rng: &mut ChaCha8Rng) -> TileState {
    match event {
        GameEvent::Start => initial_state(rng),
        GameEvent::Action(ActionPayload::Tiles(action)) => apply(s, action, rng),
        // Scoring happened tile by tile; completion and the rest are
        // host-level bookkeeping.
        GameEvent::Action(_) | GameEvent::Hint | GameEvent::Quit | GameEvent::Complete { .. } => s,
    }
}

fn view_state(meta: &GameMeta, s: &TileState) -> GameView {
    let mut lines = Vec::with_capacity(GRID_SIZE + 2);
    for row in &s.grid {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(v) => format!("{v:>4}"),
                None => "   .".to_string(),
            })
            .collect();
        lines.push(cells.join(" "));
    }
    lines.push(format!(
        "Best {} | Moves {} | Compound periods {}",
        s.best_tile, s.moves, s.compound_periods
    ));
    if s.won {
        lines.push("Reached 2048!".to_string());
    }
    if s.game_over {
        lines.push("No moves left.".to_string());
    }
    GameView {
        title: meta.title.clone(),
        status: format!(
            "Level {} | Score {} | Mistakes {}",
            s.stats.level, s.stats.score, s.stats.mistakes
        ),
        lines,
    }
}

/// The compound tiles game.
pub struct TileGame {
    meta: GameMeta,
}

impl TileGame {
    pub fn new() -> Self {
        Self { meta: meta() }
    }
}

impl Default for TileGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TileGame {
    fn meta(&self) -> &GameMeta {
        &self.meta
    }

    fn init(&self, rng: &mut ChaCha8Rng) -> GameState {
        GameState::Tiles(initial_state(rng))
    }

    fn update(&self, state: GameState, event: GameEvent, rng: &mut ChaCha8Rng) -> GameState {
        match state {
            GameState::Tiles(s) => GameState::Tiles(reduce(s, event, rng)),
            other => other,
        }
    }

    fn view(&self, state: &GameState) -> GameView {
        match state {
            GameState::Tiles(s) => view_state(&self.meta, s),
            _ => GameView {
                title: self.meta.title.clone(),
                status: "inactive".to_string(),
                lines: Vec::new(),
            },
        }
    }

    fn assess_mastery(&self, state: &GameState) -> bool {
        match state {
            GameState::Tiles(s) => s.best_tile >= 512 && s.compound_periods >= 10,
            _ => false,
        }
    }
}

fn meta() -> GameMeta {
    GameMeta {
        id: GameId::new("compound-2048"),
        title: "Compound 2048".to_string(),
        summary: "Learn compound growth through the familiar 2048 puzzle mechanics".to_string(),
        estimated_time_min: 15,
        objectives: vec![
            LearningObjective {
                id: "compound-growth".to_string(),
                text: "Understand compound growth vs simple addition".to_string(),
                rubric: vec![
                    "Can explain difference between doubling and compound interest".to_string(),
                    "Recognizes exponential growth patterns".to_string(),
                ],
            },
            LearningObjective {
                id: "interest-periods".to_string(),
                text: "Learn how compounding periods affect growth".to_string(),
                rubric: vec![
                    "Understands relationship between rate and periods".to_string(),
                    "Can calculate compound returns".to_string(),
                ],
            },
        ],
        controls: Controls {
            mouse: true,
            touch: true,
            keyboard: true,
        },
        tutorial_steps: vec![
            "Use arrow keys or swipe to move tiles".to_string(),
            "When two tiles with the same number touch, they merge".to_string(),
            "Each merge demonstrates compound growth".to_string(),
            "Try to reach 2048 to master compounding".to_string(),
            "Use undo (1 move) if you make a mistake".to_string(),
            "Watch how compound periods accelerate growth".to_string(),
        ],
        levels: 3,
    }
}
