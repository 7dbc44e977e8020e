//! Construction errors.
//!
//! Only building a board or a level can fail recoverably. Illegal inputs are
//! dropped by the queue, and a broken invariant inside a mutation cycle panics.

use thiserror::Error;

use crate::coord::TileCoord;

/// Reasons a tile grid is not a well-formed board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The grid has no rows.
    #[error("board has no tiles")]
    Empty,

    /// A row's length differs from the number of rows.
    #[error("board is not square: row {row} has {len} tiles, expected {size}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Number of rows.
        size: usize,
    },

    /// No player tile.
    #[error("board has no player")]
    MissingPlayer,

    /// More than one player tile.
    #[error("board has two players, at {first} and {second}")]
    DuplicatePlayer {
        /// First player found in scan order.
        first: TileCoord,
        /// Second player found.
        second: TileCoord,
    },

    /// More than one exit tile.
    #[error("board has two exits, at {first} and {second}")]
    DuplicateExit {
        /// First exit found in scan order.
        first: TileCoord,
        /// Second exit found.
        second: TileCoord,
    },

    /// A position lies outside the board.
    #[error("{coord} is outside a board of size {size}")]
    OutOfBounds {
        /// The position.
        coord: TileCoord,
        /// Board size.
        size: usize,
    },

    /// Player and exit were asked to share a cell.
    #[error("player and exit overlap at {0}")]
    PlayerOnExit(TileCoord),

    /// An `empty` tile is present on a board that must be settled.
    #[error("board is not settled: empty tile at {0}")]
    Unsettled(TileCoord),
}

/// Reasons a level configuration is unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Boards smaller than 3×3 cannot hold a match.
    #[error("board size {0} is too small, minimum is 3")]
    BoardTooSmall(usize),

    /// The chance model's total weight is zero.
    #[error("chance model has zero total weight")]
    ZeroTotal,

    /// The chance model's weights do not add up to its total.
    #[error("chance model weights sum to {sum}, expected {total}")]
    WeightMismatch {
        /// Sum of the weights.
        sum: u32,
        /// Declared total.
        total: u32,
    },

    /// The chance model can never produce a rock.
    #[error("chance model has no rock weight")]
    NoRockWeight,

    /// The chance model lists a tile the generator must never produce.
    #[error("chance model may not contain {0}")]
    ForbiddenTile(String),

    /// The concurrent monster cap is above the lifetime cap.
    #[error("max_monsters_on_screen ({on_screen}) exceeds max_monsters_total ({total})")]
    MonsterCaps {
        /// Concurrent cap.
        on_screen: u32,
        /// Lifetime cap.
        total: u32,
    },

    /// The board built from this configuration is malformed.
    #[error(transparent)]
    Board(#[from] BoardError),
}
