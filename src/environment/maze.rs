//! Grid maze environment
//!
//! The agent starts at `(1, 1)` and tries to reach `(height - 2, width - 2)`.
//! Walking into a wall ends the episode, as does reaching the goal.

use std::{fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ports::Environment};

/// Largest accepted maze dimension (rows and columns)
pub const MAX_MAZE_SIZE: usize = 50;

const WALL: char = '#';

/// Number of moves: up, down, left, right
pub const MAZE_ACTIONS: usize = 4;

/// Grid cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// Discrete moves understood by the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Decode an action index.
    pub fn from_action(action: usize) -> Option<Self> {
        match action {
            0 => Some(Move::Up),
            1 => Some(Move::Down),
            2 => Some(Move::Left),
            3 => Some(Move::Right),
            _ => None,
        }
    }

    pub fn action(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    fn offset(self) -> (i64, i64) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }
}

/// Validated rectangular map; `true` marks a wall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    walls: Vec<bool>,
    height: usize,
    width: usize,
}

impl MazeGrid {
    /// Load a map file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::InvalidMaze`] if its contents are rejected by [`MazeGrid::parse`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| Error::io(format!("read maze file {}", path.display()), source))?;
        Self::parse(&text)
    }

    /// Parse a map where `'#'` is a wall and any other character is floor.
    ///
    /// The map must be rectangular, between 3x3 and 50x50, and walled on
    /// every border cell so that no move can leave the grid.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        let invalid = |reason: String| Error::InvalidMaze { reason };

        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height < 3 || width < 3 {
            return Err(invalid(format!(
                "maze must be at least 3x3, got {height}x{width}"
            )));
        }
        if height > MAX_MAZE_SIZE || width > MAX_MAZE_SIZE {
            return Err(invalid(format!(
                "maze must be at most {MAX_MAZE_SIZE}x{MAX_MAZE_SIZE}, got {height}x{width}"
            )));
        }
        if let Some((row, line)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(invalid(format!(
                "row {row} has {} columns, expected {width}",
                line.len()
            )));
        }

        let walls: Vec<bool> = rows.iter().flatten().map(|&c| c == WALL).collect();
        let grid = Self {
            walls,
            height,
            width,
        };

        for row in 0..height {
            for col in 0..width {
                let border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                if border && !grid.walls[row * width + col] {
                    return Err(invalid(format!(
                        "border cell ({row}, {col}) is open; mazes must be walled on all sides"
                    )));
                }
            }
        }

        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether `pos` is inside the grid
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.height as i64).contains(&pos.row) && (0..self.width as i64).contains(&pos.col)
    }

    /// Whether `pos` is a wall; cells outside the grid count as walls
    pub fn is_wall(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return true;
        }
        self.walls[pos.row as usize * self.width + pos.col as usize]
    }

    /// State index `row * width + col`
    pub fn index_of(&self, pos: Position) -> usize {
        pos.row as usize * self.width + pos.col as usize
    }

    /// Inverse of [`MazeGrid::index_of`] for indices inside the grid
    pub fn position_of(&self, index: usize) -> Option<Position> {
        (index < self.height * self.width).then(|| {
            Position::new((index / self.width) as i64, (index % self.width) as i64)
        })
    }
}

impl FromStr for MazeGrid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Reward constants for maze outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MazeRewards {
    pub default_reward: f64,
    pub goal_reward: f64,
    pub wall_reward: f64,
}

/// Maze environment
#[derive(Debug, Clone)]
pub struct Maze {
    grid: MazeGrid,
    rewards: MazeRewards,
    start: Position,
    goal: Position,
    position: Position,
}

impl Maze {
    pub fn new(grid: MazeGrid, rewards: MazeRewards) -> Self {
        let start = Position::new(1, 1);
        let goal = Position::new(grid.height() as i64 - 2, grid.width() as i64 - 2);
        Self {
            grid,
            rewards,
            start,
            goal,
            position: start,
        }
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    fn at_goal(&self) -> bool {
        self.position == self.goal
    }

    fn in_wall(&self) -> bool {
        self.grid.is_wall(self.position)
    }
}

impl Environment for Maze {
    fn name(&self) -> &str {
        "Maze"
    }

    fn state_size(&self) -> usize {
        self.grid.height() * self.grid.width()
    }

    fn action_size(&self) -> usize {
        MAZE_ACTIONS
    }

    fn state(&self) -> usize {
        self.grid.index_of(self.position)
    }

    fn reward(&self) -> f64 {
        if self.in_wall() {
            self.rewards.wall_reward
        } else if self.at_goal() {
            self.rewards.goal_reward
        } else {
            self.rewards.default_reward
        }
    }

    fn info(&self) -> String {
        format!("{},{}", self.position.row, self.position.col)
    }

    fn reset(&mut self) {
        self.position = self.start;
    }

    fn run_step(&mut self, action: usize) -> Result<()> {
        let step = Move::from_action(action).ok_or(Error::ActionOutOfRange {
            action,
            action_size: MAZE_ACTIONS,
        })?;
        let (d_row, d_col) = step.offset();
        let next = Position::new(self.position.row + d_row, self.position.col + d_col);
        if !self.grid.contains(next) {
            return Err(Error::PositionOutOfBounds {
                row: next.row,
                col: next.col,
                height: self.grid.height(),
                width: self.grid.width(),
            });
        }
        self.position = next;
        Ok(())
    }

    fn is_finish(&self) -> bool {
        self.at_goal() || self.in_wall()
    }

    fn is_success(&self) -> bool {
        self.at_goal()
    }
}
