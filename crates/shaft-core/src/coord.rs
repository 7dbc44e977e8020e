//! Grid coordinates and compass directions.
//!
//! Boards are square arrays addressed as `tiles[row][col]`. Row 0 is the bottom
//! of the board, so [`TileCoord::row_above`] moves toward higher row indices.
//!
//! # Example
//!
//! ```
//! use shaft_core::coord::{Direction, TileCoord};
//!
//! let coord = TileCoord::new(1, 1);
//! assert_eq!(coord.row_above(), TileCoord::new(2, 1));
//! assert_eq!(coord.direction_to(TileCoord::new(3, 3)), Some(Direction::NorthEast));
//! assert_eq!(coord.direction_to(TileCoord::new(2, 3)), None);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TileCoord
// =============================================================================

/// A (row, column) position on the board.
///
/// Coordinates are signed so that neighbor arithmetic at the board edge simply
/// produces an out-of-bounds coordinate instead of wrapping. Ordering is
/// row-major (row first, then column), which is the scan order used for every
/// deterministic tie-break in the engine.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    row: i32,
    col: i32,
}

impl TileCoord {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Row index (0 is the bottom row).
    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    /// Column index (0 is the left-most column).
    #[must_use]
    pub const fn col(self) -> i32 {
        self.col
    }

    /// The coordinate one row up.
    #[must_use]
    pub const fn row_above(self) -> Self {
        Self::new(self.row + 1, self.col)
    }

    /// The coordinate one row down.
    #[must_use]
    pub const fn row_below(self) -> Self {
        Self::new(self.row - 1, self.col)
    }

    /// The coordinate one column to the left.
    #[must_use]
    pub const fn col_left(self) -> Self {
        Self::new(self.row, self.col - 1)
    }

    /// The coordinate one column to the right.
    #[must_use]
    pub const fn col_right(self) -> Self {
        Self::new(self.row, self.col + 1)
    }

    /// Moves one step in the given direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (row, col) = direction.delta();
        Self::new(self.row + row, self.col + col)
    }

    /// Returns `true` if `other` shares an edge with this coordinate.
    #[must_use]
    pub const fn is_orthogonally_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Returns `true` if `other` shares an edge or a corner with this coordinate.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// Compass direction from `self` toward `other`.
    ///
    /// Returns `None` when the coordinates are equal or when `other` is not on
    /// the same row, column, or diagonal.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        let dr = other.row - self.row;
        let dc = other.col - self.col;
        if (dr == 0 && dc == 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
            return None;
        }
        let step = (dr.signum(), dc.signum());
        Direction::ALL.into_iter().find(|d| d.delta() == step)
    }

    /// Returns `true` if the coordinate lies on a board of `size` × `size`.
    #[must_use]
    pub fn is_within(self, size: usize) -> bool {
        let Ok(size) = i32::try_from(size) else {
            return false;
        };
        (0..size).contains(&self.row) && (0..size).contains(&self.col)
    }

    /// Whether two cells are neighbors under the checkerboard adjacency rule.
    ///
    /// The cells must touch orthogonally or diagonally and the sums
    /// `row + col` of the two cells must differ by exactly one.
    #[must_use]
    pub fn is_checkerboard_neighbor(self, other: Self) -> bool {
        self.is_adjacent(other) && ((self.row + self.col) - (other.row + other.col)).abs() == 1
    }

    /// In-bounds checkerboard neighbors, in [`Direction::ALL`] order.
    pub fn checkerboard_neighbors(self, size: usize) -> impl Iterator<Item = TileCoord> {
        Direction::ALL
            .into_iter()
            .map(move |direction| self.offset(direction))
            .filter(move |neighbor| {
                neighbor.is_within(size) && self.is_checkerboard_neighbor(*neighbor)
            })
    }

    /// Converts to `(row, col)` array indices, if both are non-negative.
    #[must_use]
    pub fn indices(self) -> Option<(usize, usize)> {
        Some((usize::try_from(self.row).ok()?, usize::try_from(self.col).ok()?))
    }
}

impl fmt::Debug for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileCoord({}, {})", self.row, self.col)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

// =============================================================================
// Directions
// =============================================================================

/// One of the eight compass directions, as seen on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward higher rows.
    North,
    /// Up and to the right.
    NorthEast,
    /// Toward higher columns.
    East,
    /// Down and to the right.
    SouthEast,
    /// Toward lower rows.
    South,
    /// Down and to the left.
    SouthWest,
    /// Toward lower columns.
    West,
    /// Up and to the left.
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// `(row, col)` step for one move in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::NorthEast => (1, 1),
            Self::East => (0, 1),
            Self::SouthEast => (-1, 1),
            Self::South => (-1, 0),
            Self::SouthWest => (-1, -1),
            Self::West => (0, -1),
            Self::NorthWest => (1, -1),
        }
    }

    /// The single-bit [`Directions`] set for this direction.
    #[must_use]
    pub const fn as_flag(self) -> Directions {
        match self {
            Self::North => Directions::NORTH,
            Self::NorthEast => Directions::NORTH_EAST,
            Self::East => Directions::EAST,
            Self::SouthEast => Directions::SOUTH_EAST,
            Self::South => Directions::SOUTH,
            Self::SouthWest => Directions::SOUTH_WEST,
            Self::West => Directions::WEST,
            Self::NorthWest => Directions::NORTH_WEST,
        }
    }
}

bitflags! {
    /// A set of compass directions.
    ///
    /// Used as the "slope set" of an entity's attack: an attacker can reach
    /// the adjacent cell in each direction contained in its set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Directions: u8 {
        /// Straight up.
        const NORTH = 1 << 0;
        /// Up and to the right.
        const NORTH_EAST = 1 << 1;
        /// Straight right.
        const EAST = 1 << 2;
        /// Down and to the right.
        const SOUTH_EAST = 1 << 3;
        /// Straight down.
        const SOUTH = 1 << 4;
        /// Down and to the left.
        const SOUTH_WEST = 1 << 5;
        /// Straight left.
        const WEST = 1 << 6;
        /// Up and to the left.
        const NORTH_WEST = 1 << 7;
    }
}

impl Directions {
    /// Iterates the contained directions in [`Direction::ALL`] order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(direction.as_flag()))
    }
}

impl From<Direction> for Directions {
    fn from(direction: Direction) -> Self {
        direction.as_flag()
    }
}
