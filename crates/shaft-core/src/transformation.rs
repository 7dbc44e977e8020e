//! Diff records describing one board mutation.
//!
//! A [`Transformation`] is the only way the outside world learns what a
//! mutation did. Its groups are ordered so a presentation layer can play them
//! back as animation phases.

use serde::{Deserialize, Serialize};

use crate::coord::TileCoord;
use crate::input::InputType;
use crate::tile::{TileType, Tiles};

/// One tile's movement from `initial` to `end`.
///
/// Freshly generated tiles carry their [`TileType`] in `spawned` and start
/// above the visible grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTransformation {
    /// Where the tile started.
    pub initial: TileCoord,
    /// Where the tile ends up.
    pub end: TileCoord,
    /// The new tile, for spawns.
    pub spawned: Option<TileType>,
}

impl TileTransformation {
    /// A move from `initial` to `end`.
    #[must_use]
    pub const fn new(initial: TileCoord, end: TileCoord) -> Self {
        Self {
            initial,
            end,
            spawned: None,
        }
    }

    /// A tile that stays in place (used to mark removals and targets).
    #[must_use]
    pub const fn identity(coord: TileCoord) -> Self {
        Self::new(coord, coord)
    }

    /// A newly generated tile sliding into `end`.
    #[must_use]
    pub const fn spawn(initial: TileCoord, end: TileCoord, tile: TileType) -> Self {
        Self {
            initial,
            end,
            spawned: Some(tile),
        }
    }
}

/// The outcome of one board mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    /// Ordered animation phases.
    pub groups: Vec<Vec<TileTransformation>>,
    /// The input that produced this transformation.
    pub input_type: InputType,
    /// The settled grid after the mutation.
    pub end_tiles: Tiles,
}

impl Transformation {
    /// Creates a transformation.
    #[must_use]
    pub fn new(groups: Vec<Vec<TileTransformation>>, input_type: InputType, end_tiles: Tiles) -> Self {
        Self {
            groups,
            input_type,
            end_tiles,
        }
    }

    /// A transformation that changed nothing.
    #[must_use]
    pub fn noop(input_type: InputType, end_tiles: Tiles) -> Self {
        Self::new(Vec::new(), input_type, end_tiles)
    }

    /// Returns `true` if no tile moved, spawned or was targeted.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Total tile transformations across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Returns `true` if there are no tile transformations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every tile transformation in group order.
    pub fn iter(&self) -> impl Iterator<Item = &TileTransformation> {
        self.groups.iter().flatten()
    }
}
