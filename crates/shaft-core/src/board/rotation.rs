//! Quarter-turn rotation of the whole grid.
//!
//! Counter-clockwise maps `(row, col)` to `(col, size - 1 - row)` and
//! clockwise is its inverse, `(size - 1 - col, row)`. Both are single passes
//! over the grid that move the player and exit along with everything else.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Board;
use crate::coord::TileCoord;
use crate::input::InputType;
use crate::tile::{TileType, Tiles};
use crate::transformation::{TileTransformation, Transformation};

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// 90° clockwise.
    Clockwise,
    /// 90° counter-clockwise.
    CounterClockwise,
}

impl Rotation {
    /// Where the tile at `coord` lands on a board of side `size`.
    #[must_use]
    pub const fn destination(self, coord: TileCoord, size: i32) -> TileCoord {
        let last = size - 1;
        match self {
            Self::CounterClockwise => TileCoord::new(coord.col(), last - coord.row()),
            Self::Clockwise => TileCoord::new(last - coord.col(), coord.row()),
        }
    }

    /// The opposite turn.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

impl Board {
    /// The board turned a quarter in `rotation`, without recording moves.
    ///
    /// Pure; the referee uses it to look ahead.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        self.rotation_pass(rotation, |_, _| {})
    }

    /// Turns the board a quarter in `rotation`.
    ///
    /// The transformation holds one group with a move for every cell.
    #[must_use]
    pub fn rotate(&self, rotation: Rotation, input_type: &InputType) -> (Self, Transformation) {
        let mut moves = Vec::with_capacity(self.size() * self.size());
        let board = self.rotation_pass(rotation, |from, to| {
            moves.push(TileTransformation::new(from, to));
        });
        debug!(?rotation, moved = moves.len(), "rotate");
        let transformation = Transformation::new(vec![moves], input_type.clone(), board.tiles.clone());
        (board, transformation)
    }

    fn rotation_pass(&self, rotation: Rotation, mut record: impl FnMut(TileCoord, TileCoord)) -> Self {
        let size = self.size();
        let side = i32::try_from(size).unwrap_or(i32::MAX);
        let mut tiles: Tiles = vec![vec![TileType::Empty; size]; size];
        let mut player_position = self.player_position;
        let mut exit_position = self.exit_position;

        for (from, tile) in self.iter() {
            let to = rotation.destination(from, side);
            if let Some((row, col)) = to.indices() {
                tiles[row][col] = tile.clone();
            }
            if from == self.player_position {
                player_position = to;
            }
            if Some(from) == self.exit_position {
                exit_position = Some(to);
            }
            record(from, to);
        }

        Self {
            tiles,
            player_position,
            exit_position,
        }
    }
}
