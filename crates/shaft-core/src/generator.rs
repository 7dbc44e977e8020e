//! Procedural tile generation.
//!
//! The [`TileGenerator`] fills vacated cells. It owns the only mutable random
//! source in the engine, so replaying a seed and the same sequence of calls
//! reproduces the same tiles.
//!
//! # Constraints
//!
//! - No second exit: an exit candidate is re-rolled if the board already has
//!   one or one was generated earlier in the same batch.
//! - Monster caps: a monster candidate is re-rolled once the board holds
//!   `max_monsters_on_screen` monsters or `max_monsters_total` monsters have
//!   been generated over the generator's lifetime.
//! - Each cell gets at most [`MAX_ATTEMPTS`] rolls. If none is acceptable the
//!   batch stops early and the caller receives fewer tiles than requested.
//!   Callers retry a bounded number of times and then settle the rest with
//!   [`TileGenerator::fallback_tiles`].

use rand::{RngCore, SeedableRng};
use tracing::warn;

use crate::chance::TileTypeChanceModel;
use crate::config::LevelConfig;
use crate::coord::TileCoord;
use crate::rng::Lcg;
use crate::tile::{Color, TileType, Tiles};

/// Rolls allowed per cell before giving up on the batch.
pub const MAX_ATTEMPTS: usize = 30;

/// Fills empty cells under population caps.
#[derive(Debug, Clone)]
pub struct TileGenerator<R: RngCore = Lcg> {
    rng: R,
    chance_model: TileTypeChanceModel,
    max_monsters_total: u32,
    max_monsters_on_screen: u32,
    spawned_monsters: u32,
}

impl TileGenerator<Lcg> {
    /// A generator seeded from `config.seed` with the default LCG.
    #[must_use]
    pub fn from_config(config: &LevelConfig) -> Self {
        Self::seeded(config)
    }
}

impl<R: RngCore> TileGenerator<R> {
    /// A generator drawing from `rng`.
    #[must_use]
    pub fn new(config: &LevelConfig, rng: R) -> Self {
        Self {
            rng,
            chance_model: config.chance_model.clone(),
            max_monsters_total: config.max_monsters_total,
            max_monsters_on_screen: config.max_monsters_on_screen,
            spawned_monsters: 0,
        }
    }

    /// A generator whose source is seeded from `config.seed`.
    #[must_use]
    pub fn seeded(config: &LevelConfig) -> Self
    where
        R: SeedableRng,
    {
        Self::new(config, R::seed_from_u64(config.seed))
    }

    /// The generator with its lifetime monster count set to `spawned`.
    ///
    /// Used when resuming a level whose earlier spawns must still count
    /// toward `max_monsters_total`.
    #[must_use]
    pub const fn with_spawned_monsters(mut self, spawned: u32) -> Self {
        self.spawned_monsters = spawned;
        self
    }

    /// Monsters generated so far.
    #[must_use]
    pub const fn spawned_monsters(&self) -> u32 {
        self.spawned_monsters
    }

    /// Lifetime monster cap.
    #[must_use]
    pub const fn max_monsters_total(&self) -> u32 {
        self.max_monsters_total
    }

    /// Concurrent monster cap.
    #[must_use]
    pub const fn max_monsters_on_screen(&self) -> u32 {
        self.max_monsters_on_screen
    }

    /// Generates one tile per `empty` cell of `tiles`.
    ///
    /// Cells are visited column by column, bottom to top, and the returned
    /// tiles follow that order. Tiles generated earlier in the batch count as
    /// neighbors and toward the caps for later cells. The result is shorter
    /// than the number of empty cells only when a cell exhausted its rolls.
    pub fn tiles(&mut self, tiles: &[Vec<TileType>]) -> Vec<TileType> {
        let size = tiles.len();
        let mut scratch: Tiles = tiles.to_vec();
        let mut exit_present = scratch.iter().flatten().any(TileType::is_exit);
        let mut on_screen = count_monsters(&scratch);
        let mut generated = Vec::new();

        for col in 0..size {
            for row in 0..size {
                if !scratch[row][col].is_empty() {
                    continue;
                }
                let coord = TileCoord::new(to_i32(row), to_i32(col));
                let neighbors: Vec<TileType> = coord
                    .checkerboard_neighbors(size)
                    .filter_map(|n| n.indices())
                    .map(|(r, c)| scratch[r][c].clone())
                    .filter(|tile| !tile.is_empty())
                    .collect();
                let model = self.chance_model.increase_chances(&neighbors);

                let Some(tile) = self.roll(&model, exit_present, on_screen) else {
                    warn!(
                        %coord,
                        attempts = MAX_ATTEMPTS,
                        generated = generated.len(),
                        "tile generator exhausted its attempts"
                    );
                    return generated;
                };
                if tile.is_exit() {
                    exit_present = true;
                }
                if tile.is_monster() {
                    on_screen += 1;
                    self.spawned_monsters += 1;
                }
                scratch[row][col] = tile.clone();
                generated.push(tile);
            }
        }
        generated
    }

    /// One rock per `empty` cell of `tiles`, in the same order as [`tiles`](Self::tiles).
    ///
    /// The rock is the heaviest rock color of the base model. Callers use
    /// this once repeated rolling has failed to settle the board, so a
    /// model dominated by rejected candidates still always completes.
    pub fn fallback_tiles(&self, tiles: &[Vec<TileType>]) -> Vec<TileType> {
        let rock = self
            .chance_model
            .chances
            .iter()
            .rev()
            .filter(|(tile, weight)| tile.is_rock() && *weight > 0)
            .max_by_key(|(_, weight)| *weight)
            .map_or(TileType::Rock(Color::Blue), |(tile, _)| tile.clone());
        let empty = tiles.iter().flatten().filter(|tile| tile.is_empty()).count();
        warn!(%rock, cells = empty, "tile generator falling back to rocks");
        vec![rock; empty]
    }

    fn roll(&mut self, model: &TileTypeChanceModel, exit_present: bool, on_screen: u32) -> Option<TileType> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = model.choose(&mut self.rng)?;
            let rejected = match &candidate {
                TileType::Exit => exit_present,
                TileType::Monster(_) => {
                    on_screen >= self.max_monsters_on_screen
                        || self.spawned_monsters >= self.max_monsters_total
                }
                TileType::Player(_) | TileType::Empty => true,
                TileType::Rock(_) | TileType::Item(_) => false,
            };
            if !rejected {
                return Some(candidate);
            }
        }
        None
    }
}

fn count_monsters(tiles: &[Vec<TileType>]) -> u32 {
    let count = tiles.iter().flatten().filter(|tile| tile.is_monster()).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn to_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, EntityStatTable};
    use crate::entity::EntityType;
    use crate::tile::Color;
    use rand_chacha::ChaCha8Rng;

    fn empty_grid(size: usize) -> Tiles {
        vec![vec![TileType::Empty; size]; size]
    }

    fn monster_heavy(total: u32, on_screen: u32) -> LevelConfig {
        let rat = EntityStatTable::default().monster(EntityType::Rat);
        LevelConfig::default()
            .with_monster_caps(total, on_screen)
            .with_chance_model(TileTypeChanceModel::new(
                vec![(TileType::Rock(Color::Blue), 10), (rat, 90)],
                100,
            ))
    }

    #[test]
    fn fills_every_empty_cell() {
        let config = LevelConfig::default().with_seed(3);
        let mut generator = TileGenerator::from_config(&config);
        let tiles = generator.tiles(&empty_grid(5));
        assert_eq!(tiles.len(), 25);
        assert!(tiles.iter().all(|tile| !tile.is_empty() && !tile.is_player()));
    }

    #[test]
    fn skips_occupied_cells() {
        let mut grid = empty_grid(3);
        grid[0][0] = TileType::Rock(Color::Red);
        grid[2][1] = TileType::Rock(Color::Red);
        let mut generator = TileGenerator::from_config(&LevelConfig::default());
        assert_eq!(generator.tiles(&grid).len(), 7);
    }

    #[test]
    fn never_generates_second_exit() {
        let only_exits = TileTypeChanceModel::new(
            vec![(TileType::Rock(Color::Blue), 1), (TileType::Exit, 99)],
            100,
        );
        let config = LevelConfig::default().with_chance_model(only_exits);
        let mut generator = TileGenerator::from_config(&config);

        let tiles = generator.tiles(&empty_grid(4));
        assert!(tiles.iter().filter(|tile| tile.is_exit()).count() <= 1);

        let mut with_exit = empty_grid(4);
        with_exit[3][3] = TileType::Exit;
        let tiles = generator.tiles(&with_exit);
        assert!(tiles.iter().all(|tile| !tile.is_exit()));
    }

    #[test]
    fn respects_on_screen_cap() {
        let mut generator = TileGenerator::from_config(&monster_heavy(50, 2));
        let tiles = generator.tiles(&empty_grid(4));
        assert!(tiles.iter().filter(|tile| tile.is_monster()).count() <= 2);
    }

    #[test]
    fn respects_lifetime_cap_across_calls() {
        let mut generator = TileGenerator::from_config(&monster_heavy(3, 3));
        let mut total = 0;
        for _ in 0..5 {
            let tiles = generator.tiles(&empty_grid(3));
            total += tiles.iter().filter(|tile| tile.is_monster()).count();
        }
        assert!(total <= 3);
        assert_eq!(generator.spawned_monsters() as usize, total);
    }

    #[test]
    fn exhaustion_returns_partial_batch() {
        let exits_only = TileTypeChanceModel::new(vec![(TileType::Exit, 100)], 100);
        let config = LevelConfig::default().with_chance_model(exits_only);
        let mut generator = TileGenerator::from_config(&config);
        assert_eq!(generator.tiles(&empty_grid(3)).len(), 1);
    }

    #[test]
    fn same_seed_same_tiles() {
        let config = LevelConfig::for_difficulty(Difficulty::Hard).with_seed(77);
        let a = TileGenerator::from_config(&config).tiles(&empty_grid(6));
        let b = TileGenerator::from_config(&config).tiles(&empty_grid(6));
        assert_eq!(a, b);
    }

    #[test]
    fn accepts_any_seedable_source() {
        let config = LevelConfig::default().with_seed(12);
        let a = TileGenerator::<ChaCha8Rng>::seeded(&config).tiles(&empty_grid(4));
        let b = TileGenerator::<ChaCha8Rng>::seeded(&config).tiles(&empty_grid(4));
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);
    }
}
