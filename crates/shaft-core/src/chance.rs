//! Weighted tile selection.
//!
//! A [`TileTypeChanceModel`] assigns every candidate tile an integer weight out
//! of a fixed total. Before each pick the generator derives an adjusted model
//! from the target cell's neighbors with
//! [`increase_chances`](TileTypeChanceModel::increase_chances), which makes
//! rock colors already present nearby more likely.
//!
//! ```
//! use shaft_core::chance::TileTypeChanceModel;
//! use shaft_core::tile::{Color, TileType};
//!
//! let model = TileTypeChanceModel::uniform_rocks(&[Color::Blue, Color::Red], 100);
//! let boosted = model.increase_chances(&[TileType::Rock(Color::Blue)]);
//! assert_eq!(boosted.weight(&TileType::Rock(Color::Blue)), 55);
//! assert_eq!(boosted.weight(&TileType::Rock(Color::Red)), 45);
//! ```

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tile::{Color, TileType};

/// Default total weight.
pub const DEFAULT_TOTAL: u32 = 100;

/// Each matching neighbor boosts its color by `total / BOOST_DIVISOR`.
const BOOST_DIVISOR: u32 = 20;

/// Integer weights over candidate tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTypeChanceModel {
    /// Candidates and their weights, in a fixed order.
    pub chances: Vec<(TileType, u32)>,
    /// Weight the entries are expected to add up to.
    pub total: u32,
}

impl TileTypeChanceModel {
    /// Creates a model from explicit weights.
    #[must_use]
    pub const fn new(chances: Vec<(TileType, u32)>, total: u32) -> Self {
        Self { chances, total }
    }

    /// Equal weights over the given rock colors. Any remainder goes to the first color.
    #[must_use]
    pub fn uniform_rocks(colors: &[Color], total: u32) -> Self {
        let Ok(count) = u32::try_from(colors.len()) else {
            return Self::new(Vec::new(), total);
        };
        if count == 0 {
            return Self::new(Vec::new(), total);
        }
        let share = total / count;
        let mut chances: Vec<(TileType, u32)> = colors
            .iter()
            .map(|color| (TileType::Rock(*color), share))
            .collect();
        chances[0].1 += total - share * count;
        Self::new(chances, total)
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.chances.iter().map(|(_, weight)| weight).sum()
    }

    /// Weight of `tile`, or zero if it is not a candidate.
    #[must_use]
    pub fn weight(&self, tile: &TileType) -> u32 {
        self.chances
            .iter()
            .filter(|(candidate, _)| candidate == tile)
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Checks that the model can drive the generator.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the total is zero, the weights do not add
    /// up to it, no rock has weight, or a player or empty tile is listed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total == 0 {
            return Err(ConfigError::ZeroTotal);
        }
        if let Some((tile, _)) = self
            .chances
            .iter()
            .find(|(tile, _)| tile.is_player() || tile.is_empty())
        {
            return Err(ConfigError::ForbiddenTile(tile.to_string()));
        }
        let sum = self.sum();
        if sum != self.total {
            return Err(ConfigError::WeightMismatch {
                sum,
                total: self.total,
            });
        }
        if !self.chances.iter().any(|(tile, weight)| tile.is_rock() && *weight > 0) {
            return Err(ConfigError::NoRockWeight);
        }
        Ok(())
    }

    /// Derives a model biased toward the rock colors among `neighbors`.
    ///
    /// Every neighbor of a given color adds `total / 20` to that color. If
    /// the boosted colors alone reach the total, they are scaled to fill it
    /// and everything else drops to zero. Otherwise the remaining weight is
    /// shared among the other entries in proportion to their original weight,
    /// with the rounding leftover going to the largest of them.
    #[must_use]
    pub fn increase_chances(&self, neighbors: &[TileType]) -> Self {
        let step = self.total / BOOST_DIVISOR;
        let boosts: Vec<u32> = self
            .chances
            .iter()
            .map(|(tile, _)| match tile.color() {
                Some(color) => {
                    let count = neighbors.iter().filter(|n| n.color() == Some(color)).count();
                    u32::try_from(count).unwrap_or(u32::MAX).saturating_mul(step)
                }
                None => 0,
            })
            .collect();

        if boosts.iter().all(|boost| *boost == 0) {
            return self.clone();
        }

        let boosted: Vec<u32> = self
            .chances
            .iter()
            .zip(&boosts)
            .map(|((_, weight), boost)| if *boost > 0 { weight + boost } else { 0 })
            .collect();
        let boosted_sum: u32 = boosted.iter().sum();

        let mut weights = vec![0; self.chances.len()];
        if boosted_sum >= self.total {
            let affected: Vec<usize> = (0..weights.len()).filter(|i| boosts[*i] > 0).collect();
            for &i in &affected {
                weights[i] = scale(boosted[i], self.total, boosted_sum);
            }
            settle_leftover(&mut weights, &affected, self.total);
        } else {
            let remainder = self.total - boosted_sum;
            let unaffected: Vec<usize> = (0..weights.len()).filter(|i| boosts[*i] == 0).collect();
            let unaffected_sum: u32 = unaffected.iter().map(|i| self.chances[*i].1).sum();
            for (i, weight) in boosted.iter().enumerate() {
                weights[i] = *weight;
            }
            if unaffected_sum == 0 {
                let affected: Vec<usize> = (0..weights.len()).filter(|i| boosts[*i] > 0).collect();
                settle_leftover(&mut weights, &affected, self.total);
            } else {
                for &i in &unaffected {
                    weights[i] = scale(self.chances[i].1, remainder, unaffected_sum);
                }
                settle_leftover(&mut weights, &unaffected, self.total);
            }
        }

        Self::new(
            self.chances
                .iter()
                .zip(weights)
                .map(|((tile, _), weight)| (tile.clone(), weight))
                .collect(),
            self.total,
        )
    }

    /// Picks a candidate with probability proportional to its weight.
    ///
    /// Returns `None` if every weight is zero.
    pub fn choose<R: RngCore + ?Sized>(&self, rng: &mut R) -> Option<TileType> {
        let sum = self.sum();
        if sum == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..sum);
        for (tile, weight) in &self.chances {
            if roll < *weight {
                return Some(tile.clone());
            }
            roll -= weight;
        }
        None
    }
}

/// `value * numerator / denominator`, rounded down.
#[allow(clippy::cast_possible_truncation)]
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (u64::from(value) * u64::from(numerator) / u64::from(denominator)) as u32
}

/// Adds whatever is missing from `total` to the largest entry among `indices`.
fn settle_leftover(weights: &mut [u32], indices: &[usize], total: u32) {
    let sum: u32 = weights.iter().sum();
    let Some(&largest) = indices
        .iter()
        .rev()
        .max_by_key(|i| weights[**i])
    else {
        return;
    };
    weights[largest] += total.saturating_sub(sum);
}
