//! Level configuration.
//!
//! A [`LevelConfig`] is everything needed to build a board and drive its
//! generator: size, seed, monster caps, optional fixed positions for the
//! player and exit, the player's starting stats and the base chance model.
//! Presets for each [`Difficulty`] come from [`LevelConfig::for_difficulty`].
//!
//! # Example
//!
//! ```
//! use shaft_core::config::{Difficulty, LevelConfig};
//!
//! let config = LevelConfig::for_difficulty(Difficulty::Hard).with_seed(99);
//! assert_eq!(config.board_size, 8);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::chance::{TileTypeChanceModel, DEFAULT_TOTAL};
use crate::coord::{Directions, TileCoord};
use crate::entity::{AttackModel, Carry, EntityData, EntityType};
use crate::error::{BoardError, ConfigError};
use crate::tile::{Color, Item, TileType};

/// Smallest board that can hold a three-tile match.
pub const MIN_BOARD_SIZE: usize = 3;

/// Rock colors used by the difficulty presets.
const PRESET_COLORS: [Color; 5] = [
    Color::Blue,
    Color::Green,
    Color::Purple,
    Color::Brown,
    Color::Red,
];

// =============================================================================
// Entity stats
// =============================================================================

/// Base stats for one entity species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStats {
    /// Starting and maximum hp.
    pub hp: i32,
    /// Damage per attack.
    pub damage: i32,
    /// Turns between attacks (0 for the player).
    pub frequency: u32,
    /// Attack slope set.
    pub directions: Directions,
    /// Gold carried, dropped on death.
    pub gold: u32,
}

impl EntityStats {
    /// Built-in stats for `entity_type`.
    #[must_use]
    pub fn builtin(entity_type: EntityType) -> Self {
        let (hp, damage, frequency, directions, gold) = match entity_type {
            EntityType::Player => (5, 1, 0, Directions::NORTH, 0),
            EntityType::Rat => (2, 1, 2, Directions::SOUTH, 1),
            EntityType::Bat => (
                1,
                1,
                1,
                Directions::SOUTH_EAST | Directions::SOUTH | Directions::SOUTH_WEST,
                1,
            ),
            EntityType::Alamo => (
                3,
                1,
                3,
                Directions::EAST | Directions::WEST | Directions::SOUTH,
                2,
            ),
            EntityType::Dragon => (5, 2, 3, Directions::SOUTH, 4),
            EntityType::Sally => (2, 1, 2, Directions::NORTH | Directions::SOUTH, 2),
        };
        Self {
            hp,
            damage,
            frequency,
            directions,
            gold,
        }
    }

    /// Fresh entity data with these stats.
    #[must_use]
    pub fn entity(&self, entity_type: EntityType) -> EntityData {
        let mut data = EntityData::new(
            entity_type,
            self.hp,
            AttackModel::new(self.frequency, self.damage, self.directions),
        );
        data.carry = Carry::gold(self.gold);
        data
    }
}

/// Per-species stat overrides, falling back to the built-in stats.
///
/// Level-loading code may deserialize its own table; species it leaves out
/// keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStatTable {
    /// Overridden species.
    #[serde(default)]
    pub stats: BTreeMap<EntityType, EntityStats>,
}

impl EntityStatTable {
    /// The table with `stats` set for `entity_type`.
    #[must_use]
    pub fn with(mut self, entity_type: EntityType, stats: EntityStats) -> Self {
        self.stats.insert(entity_type, stats);
        self
    }

    /// Stats for `entity_type`.
    #[must_use]
    pub fn get(&self, entity_type: EntityType) -> EntityStats {
        self.stats
            .get(&entity_type)
            .copied()
            .unwrap_or_else(|| EntityStats::builtin(entity_type))
    }

    /// Fresh entity data for `entity_type`.
    #[must_use]
    pub fn entity(&self, entity_type: EntityType) -> EntityData {
        self.get(entity_type).entity(entity_type)
    }

    /// A monster tile of species `entity_type`.
    #[must_use]
    pub fn monster(&self, entity_type: EntityType) -> TileType {
        TileType::Monster(self.entity(entity_type))
    }

    /// The player's starting data.
    #[must_use]
    pub fn player(&self) -> EntityData {
        self.entity(EntityType::Player)
    }
}

// =============================================================================
// Level configuration
// =============================================================================

/// Difficulty presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Few monsters, smaller board.
    Easy,
    /// The default.
    #[default]
    Normal,
    /// More and stronger monsters on a larger board.
    Hard,
}

/// Everything needed to build a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Side length of the square board.
    pub board_size: usize,
    /// Preset this level was derived from.
    pub difficulty: Difficulty,
    /// Seed for the tile generator.
    pub seed: u64,
    /// Lifetime monster budget.
    pub max_monsters_total: u32,
    /// Concurrent monster cap.
    pub max_monsters_on_screen: u32,
    /// Player start. Defaults to the middle of the bottom row.
    pub player_position: Option<TileCoord>,
    /// Exit position. When unset the generator may place an exit.
    pub exit_position: Option<TileCoord>,
    /// The player's starting data.
    pub player: EntityData,
    /// Base weights for generated tiles.
    pub chance_model: TileTypeChanceModel,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl LevelConfig {
    /// The preset for `difficulty`, using built-in entity stats.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_stats(difficulty, &EntityStatTable::default())
    }

    /// The preset for `difficulty`, using `table` for entity stats.
    #[must_use]
    pub fn with_stats(difficulty: Difficulty, table: &EntityStatTable) -> Self {
        let (board_size, total, on_screen, rock_weight) = match difficulty {
            Difficulty::Easy => (7, 8, 3, 18),
            Difficulty::Normal => (7, 12, 4, 17),
            Difficulty::Hard => (8, 16, 6, 16),
        };
        let mut chances: Vec<(TileType, u32)> = PRESET_COLORS
            .iter()
            .map(|color| (TileType::Rock(*color), rock_weight))
            .collect();
        let extras: &[(EntityType, u32)] = match difficulty {
            Difficulty::Easy => &[(EntityType::Rat, 4)],
            Difficulty::Normal => &[(EntityType::Rat, 5), (EntityType::Bat, 3)],
            Difficulty::Hard => &[
                (EntityType::Rat, 6),
                (EntityType::Bat, 4),
                (EntityType::Dragon, 3),
            ],
        };
        chances.extend(
            extras
                .iter()
                .map(|(entity_type, weight)| (table.monster(*entity_type), *weight)),
        );
        chances.push((TileType::Item(Item::gold(1)), 4));
        let exit_weight = if difficulty == Difficulty::Easy { 2 } else { 3 };
        chances.push((TileType::Exit, exit_weight));

        Self {
            board_size,
            difficulty,
            seed: 0,
            max_monsters_total: total,
            max_monsters_on_screen: on_screen,
            player_position: None,
            exit_position: None,
            player: table.player(),
            chance_model: TileTypeChanceModel::new(chances, DEFAULT_TOTAL),
        }
    }

    /// Sets the generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the board size.
    #[must_use]
    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    /// Sets both monster caps.
    #[must_use]
    pub fn with_monster_caps(mut self, total: u32, on_screen: u32) -> Self {
        self.max_monsters_total = total;
        self.max_monsters_on_screen = on_screen;
        self
    }

    /// Fixes the player start.
    #[must_use]
    pub fn with_player_position(mut self, coord: TileCoord) -> Self {
        self.player_position = Some(coord);
        self
    }

    /// Fixes the exit position.
    #[must_use]
    pub fn with_exit_position(mut self, coord: TileCoord) -> Self {
        self.exit_position = Some(coord);
        self
    }

    /// Sets the player's starting data.
    #[must_use]
    pub fn with_player(mut self, player: EntityData) -> Self {
        self.player = player;
        self
    }

    /// Replaces the base chance model.
    #[must_use]
    pub fn with_chance_model(mut self, chance_model: TileTypeChanceModel) -> Self {
        self.chance_model = chance_model;
        self
    }

    /// Where the player starts on a fresh board.
    #[must_use]
    pub fn player_start(&self) -> TileCoord {
        self.player_position.unwrap_or_else(|| {
            let middle = i32::try_from(self.board_size / 2).unwrap_or(0);
            TileCoord::new(0, middle)
        })
    }

    /// Checks the configuration before a board is built from it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        self.chance_model.validate()?;
        if self.max_monsters_on_screen > self.max_monsters_total {
            return Err(ConfigError::MonsterCaps {
                on_screen: self.max_monsters_on_screen,
                total: self.max_monsters_total,
            });
        }
        let player = self.player_start();
        for coord in std::iter::once(player).chain(self.exit_position) {
            if !coord.is_within(self.board_size) {
                return Err(BoardError::OutOfBounds {
                    coord,
                    size: self.board_size,
                }
                .into());
            }
        }
        if self.exit_position == Some(player) {
            return Err(BoardError::PlayerOnExit(player).into());
        }
        Ok(())
    }
}
