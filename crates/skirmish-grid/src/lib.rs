//! # Skirmish Grid
//!
//! Occupancy grid substrate for turn-based skirmishes.
//!
//! The grid maps integer cells to the ordered list of entities standing on
//! them. It knows nothing about what an entity *is*; callers pick the handle
//! type (usually a small `Copy` id) and the grid keeps placement consistent:
//!
//! - **Single placement**: an entity is recorded under exactly one cell
//! - **No empty cells**: removing the last occupant removes the cell key
//! - **Stable order**: occupants keep insertion order, which is display priority
//! - **Manhattan metric**: all range checks use `|Δrow| + |Δcol|`
//!
//! ## Quick Start
//!
//! ```
//! use skirmish_grid::{Direction, Grid, Position};
//!
//! let mut grid: Grid<u32> = Grid::new();
//! grid.place(Position::new(3, 3), 1);
//! grid.place(Position::new(2, 3), 2);
//!
//! // The cell above entity 1 is taken, so it cannot step up
//! assert!(grid.step(1, Direction::Up).is_err());
//! assert_eq!(grid.step(1, Direction::Down), Ok(Position::new(4, 3)));
//!
//! let nearby: Vec<u32> = grid.within(Position::new(3, 3), 2).map(|(_, e)| *e).collect();
//! assert_eq!(nearby, vec![2, 1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod hash;

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use grid::{Grid, MoveError};
pub use hash::hash_grid;

// =============================================================================
// Position
// =============================================================================

/// Integer grid coordinate.
///
/// Positions are plain values: copying one never aliases another entity's
/// location. Ordering is row-major, which is the iteration order of every
/// map keyed by `Position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (grows downward)
    pub row: i32,
    /// Column index (grows rightward)
    pub col: i32,
}

impl Position {
    /// Create a position from row and column.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position.
    ///
    /// Symmetric, and zero only for equal positions. Saturates at
    /// `u32::MAX` for positions at opposite corners of the `i32` plane.
    #[must_use]
    pub fn distance_to(self, other: Position) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// Translate by a cell offset (`x` is columns, `y` is rows).
    #[must_use]
    pub fn offset(self, delta: IVec2) -> Self {
        Self {
            row: self.row.saturating_add(delta.y),
            col: self.col.saturating_add(delta.x),
        }
    }

    /// The adjacent position in a direction.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Self {
        self.offset(direction.delta())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

// =============================================================================
// Direction
// =============================================================================

/// One of the four orthogonal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward row 0
    Up,
    /// Away from row 0
    Down,
    /// Toward column 0
    Left,
    /// Away from column 0
    Right,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Cell offset for one step (`x` is columns, `y` is rows).
    #[must_use]
    pub const fn delta(self) -> IVec2 {
        match self {
            Self::Up => IVec2::NEG_Y,
            Self::Down => IVec2::Y,
            Self::Left => IVec2::NEG_X,
            Self::Right => IVec2::X,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction `{0}` (expected up, down, left or right)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Self::Up),
            "down" | "d" => Ok(Self::Down),
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

// =============================================================================
// Extent
// =============================================================================

/// Size of the generated area, anchored at `(0, 0)`.
///
/// The extent describes where content was generated and what a renderer
/// should draw. It does not bound movement: cells outside it are simply
/// never populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub cols: u32,
}

impl Extent {
    /// Create an extent.
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Check if a position lies inside the extent.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        u32::try_from(position.row).is_ok_and(|r| r < self.rows)
            && u32::try_from(position.col).is_ok_and(|c| c < self.cols)
    }

    /// Number of cells covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    /// All positions inside the extent in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = i32::try_from(self.cols).unwrap_or(i32::MAX);
        let rows = i32::try_from(self.rows).unwrap_or(i32::MAX);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }
}
