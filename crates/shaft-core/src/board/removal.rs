//! Flood-fill removal, gravity compaction and refill.
//!
//! Removal happens in three steps, each recorded as one transformation group:
//!
//! 1. The selected cells become `empty` (identity moves, for the removal
//!    animation).
//! 2. Each column is compacted bottom to top: every tile drops by the number
//!    of `empty` cells found below it so far.
//! 3. The generator fills the cells left open at the top of each column. A
//!    spawned tile starts above the grid, as far up as its column shifted.
//!
//! The groups are emitted in the order removed, spawned, shifted. Spawned
//! tiles appear in both of the last two groups.

use rand::RngCore;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

use super::{place_in_empty_cells, Board, MAX_FILL_ROUNDS};
use crate::coord::TileCoord;
use crate::generator::TileGenerator;
use crate::input::InputType;
use crate::tile::TileType;
use crate::transformation::{TileTransformation, Transformation};

/// Smallest connected group that can be removed.
pub const MIN_GROUP_SIZE: usize = 3;

impl Board {
    /// The connected group of matching tiles containing `coord`.
    ///
    /// Connectivity follows the checkerboard neighbor rule. A tile that does
    /// not match anything (anything but a rock) forms a group of one. The
    /// result is sorted row-major and empty when `coord` is off the board.
    #[must_use]
    pub fn group(&self, coord: TileCoord) -> Vec<TileCoord> {
        let Some(start) = self.get(coord) else {
            return Vec::new();
        };
        let mut group = BTreeSet::from([coord]);
        let mut frontier = VecDeque::from([coord]);
        while let Some(current) = frontier.pop_front() {
            for neighbor in current.checkerboard_neighbors(self.size()) {
                let matches = self.get(neighbor).is_some_and(|tile| start.matches(tile));
                if matches && group.insert(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }
        group.into_iter().collect()
    }

    /// The group at `coord`, if it is large enough to remove.
    #[must_use]
    pub fn removable_group(&self, coord: TileCoord) -> Option<Vec<TileCoord>> {
        let group = self.group(coord);
        (group.len() >= MIN_GROUP_SIZE && start_is_rock(self, coord)).then_some(group)
    }

    /// Returns `true` if any removable group exists.
    #[must_use]
    pub fn has_removable_group(&self) -> bool {
        let mut seen = BTreeSet::new();
        for (coord, tile) in self.iter() {
            if !tile.is_rock() || seen.contains(&coord) {
                continue;
            }
            let group = self.group(coord);
            if group.len() >= MIN_GROUP_SIZE {
                return true;
            }
            seen.extend(group);
        }
        false
    }

    /// The transformation a touch at `coord` would produce, without applying it.
    ///
    /// Holds one group with the cells that would be removed, or nothing when
    /// the group is too small.
    #[must_use]
    pub fn preview(&self, coord: TileCoord, input_type: &InputType) -> Transformation {
        let groups = self
            .removable_group(coord)
            .map(|group| vec![group.into_iter().map(TileTransformation::identity).collect()])
            .unwrap_or_default();
        Transformation::new(groups, input_type.clone(), self.tiles.clone())
    }

    /// Removes the group at `coord` (or just `coord` when `single_tile`) and refills.
    ///
    /// Groups smaller than [`MIN_GROUP_SIZE`], an off-board `coord` and the
    /// player's own cell leave the board unchanged and yield a no-op
    /// transformation. Cells the generator has not filled after
    /// [`MAX_FILL_ROUNDS`] calls are settled with fallback rocks.
    ///
    /// # Panics
    ///
    /// Panics if the refilled board is malformed.
    pub fn remove_and_replace<R: RngCore>(
        &self,
        coord: TileCoord,
        single_tile: bool,
        generator: &mut TileGenerator<R>,
        input_type: &InputType,
    ) -> (Self, Transformation) {
        let cells = if single_tile {
            if matches!(self.get(coord), None | Some(TileType::Player(_))) {
                return self.unchanged(input_type);
            }
            vec![coord]
        } else {
            match self.removable_group(coord) {
                Some(group) => group,
                None => return self.unchanged(input_type),
            }
        };
        self.remove_cells(&cells, generator, input_type)
    }

    fn remove_cells<R: RngCore>(
        &self,
        cells: &[TileCoord],
        generator: &mut TileGenerator<R>,
        input_type: &InputType,
    ) -> (Self, Transformation) {
        let size = self.size();
        let mut tiles = self.tiles.clone();
        for (row, col) in cells.iter().filter_map(|coord| coord.indices()) {
            tiles[row][col] = TileType::Empty;
        }
        let removed: Vec<TileTransformation> =
            cells.iter().copied().map(TileTransformation::identity).collect();

        let mut shifts = Vec::new();
        let mut column_shift = vec![0usize; size];
        for (col, slot) in column_shift.iter_mut().enumerate() {
            let mut shift = 0;
            for row in 0..size {
                if tiles[row][col].is_empty() {
                    shift += 1;
                } else if shift > 0 {
                    let tile = std::mem::replace(&mut tiles[row][col], TileType::Empty);
                    tiles[row - shift][col] = tile;
                    shifts.push(TileTransformation::new(
                        coord_at(row, col),
                        coord_at(row - shift, col),
                    ));
                }
            }
            *slot = shift;
        }
        let total_shift: usize = column_shift.iter().sum();

        let mut spawned = Vec::with_capacity(total_shift);
        for round in 0..=MAX_FILL_ROUNDS {
            if spawned.len() == total_shift {
                break;
            }
            let generated = if round < MAX_FILL_ROUNDS {
                generator.tiles(&tiles)
            } else {
                generator.fallback_tiles(&tiles)
            };
            let batch = generated.clone();
            let filled = place_in_empty_cells(&mut tiles, generated);
            for (end, tile) in filled.into_iter().zip(batch) {
                let (_, col) = end.indices().unwrap_or_default();
                let start = TileCoord::new(end.row() + to_i32(column_shift[col]), end.col());
                spawned.push(TileTransformation::spawn(start, end, tile));
                shifts.push(TileTransformation::new(start, end));
            }
        }
        assert_eq!(
            spawned.len(),
            total_shift,
            "generated tile count must equal the total column shift"
        );

        debug!(
            removed = removed.len(),
            spawned = spawned.len(),
            moved = shifts.len(),
            "remove and replace"
        );
        let board = Self::settled(tiles);
        let transformation = Transformation::new(
            vec![removed, spawned, shifts],
            input_type.clone(),
            board.tiles.clone(),
        );
        (board, transformation)
    }

    /// Picks up the item at `coord` and refills its cell.
    ///
    /// No-op unless `coord` holds an item.
    pub fn collect_item<R: RngCore>(
        &self,
        coord: TileCoord,
        generator: &mut TileGenerator<R>,
        input_type: &InputType,
    ) -> (Self, Transformation) {
        let Some(TileType::Item(item)) = self.get(coord) else {
            return self.unchanged(input_type);
        };
        let player = TileType::Player(self.player().collecting(*item));
        let collected = Self {
            tiles: self.tiles_with(self.player_position, player),
            player_position: self.player_position,
            exit_position: self.exit_position,
        };
        collected.remove_and_replace(coord, true, generator, input_type)
    }
}

fn start_is_rock(board: &Board, coord: TileCoord) -> bool {
    board.get(coord).is_some_and(TileType::is_rock)
}

fn coord_at(row: usize, col: usize) -> TileCoord {
    TileCoord::new(to_i32(row), to_i32(col))
}

fn to_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
