//! The board: an immutable grid of tiles and every mutation on it.
//!
//! A [`Board`] is a settled square grid with exactly one player and at most
//! one exit. Mutations never modify a board in place; each returns a new
//! board together with the [`Transformation`] describing the change.
//!
//! # Layout
//!
//! `tiles[row][col]`, with row 0 at the bottom. Gravity pulls tiles toward
//! row 0, new tiles enter from above the top row, and the player attacks the
//! cell at `row + 1`.
//!
//! # Mutations
//!
//! - [`rotation`]: quarter turns of the whole grid.
//! - [`removal`]: flood-fill removal, gravity compaction and refill.
//! - [`combat`]: attacks, deaths and other single-cell updates.
//!
//! [`Board::apply`] routes an [`InputType`] to the right mutation.
//!
//! # Example
//!
//! ```
//! use shaft_core::board::Board;
//! use shaft_core::config::LevelConfig;
//! use shaft_core::generator::TileGenerator;
//!
//! let config = LevelConfig::default().with_seed(1);
//! let mut generator = TileGenerator::from_config(&config);
//! let board = Board::build(&config, &mut generator).unwrap();
//! assert_eq!(board.size(), config.board_size);
//! assert_eq!(board.player_position(), config.player_start());
//! ```

pub mod combat;
pub mod removal;
pub mod rotation;

pub use rotation::Rotation;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

use crate::config::LevelConfig;
use crate::coord::TileCoord;
use crate::entity::EntityData;
use crate::error::{BoardError, ConfigError};
use crate::generator::TileGenerator;
use crate::input::InputType;
use crate::tile::{TileType, Tiles};
use crate::transformation::Transformation;

/// Generator calls allowed to fill a board before falling back to rocks.
pub const MAX_FILL_ROUNDS: usize = 4;

/// A settled board snapshot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Tiles", into = "Tiles")]
pub struct Board {
    tiles: Tiles,
    player_position: TileCoord,
    exit_position: Option<TileCoord>,
}

impl Board {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Validates `tiles` and caches the player and exit positions.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if the grid is empty or not square, holds an
    /// `empty` tile, or does not hold exactly one player and at most one exit.
    pub fn new(tiles: Tiles) -> Result<Self, BoardError> {
        let size = tiles.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if let Some((row, len)) = tiles
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != size)
        {
            return Err(BoardError::NotSquare { row, len, size });
        }

        let mut player_position = None;
        let mut exit_position = None;
        for (coord, tile) in coords(size).zip(tiles.iter().flatten()) {
            match tile {
                TileType::Empty => return Err(BoardError::Unsettled(coord)),
                TileType::Player(_) => {
                    if let Some(first) = player_position {
                        return Err(BoardError::DuplicatePlayer {
                            first,
                            second: coord,
                        });
                    }
                    player_position = Some(coord);
                }
                TileType::Exit => {
                    if let Some(first) = exit_position {
                        return Err(BoardError::DuplicateExit {
                            first,
                            second: coord,
                        });
                    }
                    exit_position = Some(coord);
                }
                TileType::Rock(_) | TileType::Monster(_) | TileType::Item(_) => {}
            }
        }

        let player_position = player_position.ok_or(BoardError::MissingPlayer)?;
        Ok(Self {
            tiles,
            player_position,
            exit_position,
        })
    }

    /// Builds a fresh level board.
    ///
    /// The player goes to [`LevelConfig::player_start`], the exit to
    /// `exit_position` when one is configured, and `generator` fills the rest.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid or the
    /// generator could not fill the board.
    #[instrument(skip_all, fields(size = config.board_size, seed = config.seed))]
    pub fn build<R: RngCore>(
        config: &LevelConfig,
        generator: &mut TileGenerator<R>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.board_size;
        let mut tiles = vec![vec![TileType::Empty; size]; size];

        let player = config.player_start();
        if let Some((row, col)) = player.indices() {
            tiles[row][col] = TileType::Player(config.player.clone());
        }
        if let Some((row, col)) = config.exit_position.and_then(TileCoord::indices) {
            tiles[row][col] = TileType::Exit;
        }

        for round in 0..=MAX_FILL_ROUNDS {
            if !tiles.iter().flatten().any(TileType::is_empty) {
                break;
            }
            let generated = if round < MAX_FILL_ROUNDS {
                generator.tiles(&tiles)
            } else {
                generator.fallback_tiles(&tiles)
            };
            place_in_empty_cells(&mut tiles, generated);
        }

        Self::new(tiles).map_err(ConfigError::from)
    }

    /// Wraps the result of a mutation, failing fast on a malformed grid.
    ///
    /// # Panics
    ///
    /// Panics if `tiles` is not a well-formed settled board. Every mutation
    /// must preserve the board invariants, so this indicates a bug.
    pub(crate) fn settled(tiles: Tiles) -> Self {
        match Self::new(tiles) {
            Ok(board) => board,
            Err(err) => panic!("board invariant violated by mutation: {err}"),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// The tile grid.
    #[must_use]
    pub fn tiles(&self) -> &Tiles {
        &self.tiles
    }

    /// Consumes the board, returning its grid.
    #[must_use]
    pub fn into_tiles(self) -> Tiles {
        self.tiles
    }

    /// Position of the player.
    #[must_use]
    pub const fn player_position(&self) -> TileCoord {
        self.player_position
    }

    /// Position of the exit, if the board has one.
    #[must_use]
    pub const fn exit_position(&self) -> Option<TileCoord> {
        self.exit_position
    }

    /// Tile at `coord`, or `None` when it lies off the board.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<&TileType> {
        if !coord.is_within(self.size()) {
            return None;
        }
        let (row, col) = coord.indices()?;
        Some(&self.tiles[row][col])
    }

    /// The player's data.
    ///
    /// # Panics
    ///
    /// Panics if the cached player position does not hold the player, which
    /// construction rules out.
    #[must_use]
    pub fn player(&self) -> &EntityData {
        match self.get(self.player_position) {
            Some(TileType::Player(data)) => data,
            _ => unreachable!("player position {} is stale", self.player_position),
        }
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        coords(self.size())
    }

    /// Every `(coord, tile)` pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &TileType)> {
        coords(self.size()).zip(self.tiles.iter().flatten())
    }

    /// Every monster with its position, in row-major order.
    pub fn monsters(&self) -> impl Iterator<Item = (TileCoord, &EntityData)> {
        self.iter().filter_map(|(coord, tile)| match tile {
            TileType::Monster(data) => Some((coord, data)),
            _ => None,
        })
    }

    /// Number of tiles satisfying `predicate`.
    pub fn count(&self, predicate: impl Fn(&TileType) -> bool) -> usize {
        self.tiles.iter().flatten().filter(|tile| predicate(tile)).count()
    }

    /// The grid with `tile` written at `coord`.
    pub(crate) fn tiles_with(&self, coord: TileCoord, tile: TileType) -> Tiles {
        let mut tiles = self.tiles.clone();
        if let Some((row, col)) = coord.indices() {
            if let Some(slot) = tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
                *slot = tile;
            }
        }
        tiles
    }

    // =========================================================================
    // Turns and dispatch
    // =========================================================================

    /// The board after one turn passes for every entity.
    ///
    /// Monster attack charges advance, the player may attack again, and
    /// status effects tick.
    #[must_use]
    pub fn advanced_turn(&self) -> Self {
        let tiles = self
            .tiles
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match tile {
                        TileType::Player(data) => TileType::Player(data.advanced_turn()),
                        TileType::Monster(data) => TileType::Monster(data.advanced_turn()),
                        other => other.clone(),
                    })
                    .collect()
            })
            .collect();
        Self {
            tiles,
            player_position: self.player_position,
            exit_position: self.exit_position,
        }
    }

    /// Applies `input_type` and returns the new board and its transformation.
    ///
    /// Rotations and successful removals consume a turn. Inputs that do not
    /// mutate the board yield a no-op transformation and an unchanged board.
    pub fn apply<R: RngCore>(
        &self,
        input_type: &InputType,
        generator: &mut TileGenerator<R>,
    ) -> (Self, Transformation) {
        match input_type {
            InputType::Touch { coord, .. } => {
                if self.removable_group(*coord).is_some() {
                    self.advanced_turn()
                        .remove_and_replace(*coord, false, generator, input_type)
                } else {
                    self.unchanged(input_type)
                }
            }
            InputType::TouchBegan { coord, .. } => {
                (self.clone(), self.preview(*coord, input_type))
            }
            InputType::RotateLeft => self
                .advanced_turn()
                .rotate(Rotation::CounterClockwise, input_type),
            InputType::RotateRight => self.advanced_turn().rotate(Rotation::Clockwise, input_type),
            InputType::Attack {
                attacker,
                attacker_is_player,
                ..
            } => self.attack(*attacker, *attacker_is_player, input_type),
            InputType::MonsterDies { coord, .. } => self.monster_dies(*coord, input_type),
            InputType::CollectItem { coord, .. } => self.collect_item(*coord, generator, input_type),
            InputType::UnlockExit => self.unlock_exit(input_type),
            InputType::RuneReplaced { old, new } => self.replace_rune(*old, *new, input_type),
            _ => self.unchanged(input_type),
        }
    }

    /// This board and a no-op transformation for `input_type`.
    pub(crate) fn unchanged(&self, input_type: &InputType) -> (Self, Transformation) {
        (
            self.clone(),
            Transformation::noop(input_type.clone(), self.tiles.clone()),
        )
    }
}

impl TryFrom<Tiles> for Board {
    type Error = BoardError;

    fn try_from(tiles: Tiles) -> Result<Self, Self::Error> {
        Self::new(tiles)
    }
}

impl From<Board> for Tiles {
    fn from(board: Board) -> Self {
        board.tiles
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ player: {}, exit: {:?} }}", self.player_position, self.exit_position)?;
        fmt::Display::fmt(self, f)
    }
}

/// Renders one glyph per tile, top row first.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.iter().rev() {
            let line: String = row.iter().map(TileType::glyph).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Row-major coordinates of a `size` × `size` grid.
pub(crate) fn coords(size: usize) -> impl Iterator<Item = TileCoord> {
    let side = i32::try_from(size).unwrap_or(0);
    (0..side).flat_map(move |row| (0..side).map(move |col| TileCoord::new(row, col)))
}

/// Writes `generated` into the `empty` cells of `tiles`, column by column and
/// bottom to top, which is the order the generator produces them in.
///
/// Returns the coordinates that were filled.
pub(crate) fn place_in_empty_cells(tiles: &mut Tiles, generated: Vec<TileType>) -> Vec<TileCoord> {
    let size = tiles.len();
    let mut generated = generated.into_iter();
    let mut filled = Vec::new();
    for col in 0..size {
        for row in 0..size {
            if !tiles[row][col].is_empty() {
                continue;
            }
            let Some(tile) = generated.next() else {
                return filled;
            };
            tiles[row][col] = tile;
            filled.push(TileCoord::new(
                i32::try_from(row).unwrap_or(i32::MAX),
                i32::try_from(col).unwrap_or(i32::MAX),
            ));
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::helpers::{board_from_ascii, tiles_from_ascii};
    use crate::tile::Color;

    mod construction_tests {
        use super::*;

        #[test]
        fn caches_player_and_exit() {
            let board = board_from_ascii(&["bgE", "gbg", "bPb"]);
            assert_eq!(board.player_position(), TileCoord::new(0, 1));
            assert_eq!(board.exit_position(), Some(TileCoord::new(2, 2)));
            assert_eq!(board.player().hp, board.player().original_hp);
        }

        #[test]
        fn rejects_malformed_grids() {
            assert_eq!(Board::new(Vec::new()), Err(BoardError::Empty));
            assert_eq!(
                Board::new(tiles_from_ascii(&["bgb", "gbg"])),
                Err(BoardError::NotSquare { row: 0, len: 3, size: 2 })
            );
            assert_eq!(
                Board::new(tiles_from_ascii(&["bgb", "gbg", "bgb"])),
                Err(BoardError::MissingPlayer)
            );
            assert_eq!(
                Board::new(tiles_from_ascii(&["bgP", "gbg", "Pgb"])),
                Err(BoardError::DuplicatePlayer {
                    first: TileCoord::new(0, 0),
                    second: TileCoord::new(2, 2),
                })
            );
            assert_eq!(
                Board::new(tiles_from_ascii(&["EgE", "gPg", "bgb"])),
                Err(BoardError::DuplicateExit {
                    first: TileCoord::new(2, 0),
                    second: TileCoord::new(2, 2),
                })
            );
            assert_eq!(
                Board::new(tiles_from_ascii(&["b.b", "gPg", "bgb"])),
                Err(BoardError::Unsettled(TileCoord::new(2, 1)))
            );
        }

        #[test]
        fn build_places_player_and_exit() {
            let config = LevelConfig::default()
                .with_seed(8)
                .with_board_size(5)
                .with_player_position(TileCoord::new(1, 1))
                .with_exit_position(TileCoord::new(4, 4));
            let mut generator = TileGenerator::from_config(&config);
            let board = Board::build(&config, &mut generator).unwrap();
            assert_eq!(board.player_position(), TileCoord::new(1, 1));
            assert_eq!(board.exit_position(), Some(TileCoord::new(4, 4)));
            assert_eq!(board.count(TileType::is_empty), 0);
        }

        #[test]
        fn build_settles_a_starved_generator() {
            let config = LevelConfig::default()
                .with_board_size(4)
                .with_monster_caps(0, 0)
                .with_chance_model(crate::chance::TileTypeChanceModel::new(
                    vec![(TileType::Rock(Color::Red), 1), (TileType::Exit, 99)],
                    100,
                ));
            for seed in 0..20 {
                let config = config.clone().with_seed(seed);
                let mut generator = TileGenerator::from_config(&config);
                let board = Board::build(&config, &mut generator).unwrap();
                assert_eq!(board.count(TileType::is_empty), 0);
                assert!(board.count(TileType::is_exit) <= 1);
            }
        }

        #[test]
        fn build_rejects_invalid_config() {
            let config = LevelConfig::default().with_board_size(1);
            let mut generator = TileGenerator::from_config(&config);
            assert_eq!(
                Board::build(&config, &mut generator),
                Err(ConfigError::BoardTooSmall(1))
            );
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn get_is_bounds_checked() {
            let board = board_from_ascii(&["bgb", "gPg", "bgr"]);
            assert_eq!(board.get(TileCoord::new(0, 2)), Some(&TileType::Rock(Color::Red)));
            assert_eq!(board.get(TileCoord::new(3, 0)), None);
            assert_eq!(board.get(TileCoord::new(0, -1)), None);
        }

        #[test]
        fn display_renders_top_row_first() {
            let rows = ["bgE", "gPg", "bgr"];
            let board = board_from_ascii(&rows);
            assert_eq!(board.to_string(), "bgE\ngPg\nbgr\n");
        }

        #[test]
        fn monsters_in_scan_order() {
            let board = board_from_ascii(&["MgM", "gPg", "Mgb"]);
            let coords: Vec<_> = board.monsters().map(|(coord, _)| coord).collect();
            assert_eq!(
                coords,
                vec![TileCoord::new(0, 0), TileCoord::new(2, 0), TileCoord::new(2, 2)]
            );
        }

        #[test]
        fn serialization_roundtrip() {
            let board = board_from_ascii(&["bgE", "gPM", "bgr"]);
            let json = serde_json::to_string(&board).unwrap();
            let deserialized: Board = serde_json::from_str(&json).unwrap();
            assert_eq!(board, deserialized);
        }

        #[test]
        fn deserialization_validates() {
            let tiles = tiles_from_ascii(&["bgb", "gbg", "bgb"]);
            let json = serde_json::to_string(&tiles).unwrap();
            assert!(serde_json::from_str::<Board>(&json).is_err());
        }
    }

    mod turn_tests {
        use super::*;

        #[test]
        fn turn_charges_monsters() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]);
            let later = board.advanced_turn().advanced_turn();
            let (_, rat) = later.monsters().next().unwrap();
            assert!(rat.attack.is_charged());
        }

        #[test]
        fn unhandled_inputs_are_noops() {
            let board = board_from_ascii(&["bgb", "gPg", "bgb"]);
            let mut generator = TileGenerator::from_config(&LevelConfig::default());
            let (next, transformation) = board.apply(&InputType::GoalCompleted, &mut generator);
            assert_eq!(next, board);
            assert!(transformation.is_noop());
            assert_eq!(&transformation.end_tiles, board.tiles());
        }
    }
}
