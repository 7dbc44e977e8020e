//! Seedable linear congruential generator.
//!
//! The tile generator draws all of its randomness from one owned source.
//! [`Lcg`] is the default: a 64-bit LCG with Knuth's MMIX constants, returning
//! the high 32 bits of the state for each `u32`. It plugs into `rand` through
//! [`RngCore`] and [`SeedableRng`], so any other seedable `rand` source can
//! stand in for it.
//!
//! ```
//! use rand::{Rng, SeedableRng};
//! use shaft_core::rng::Lcg;
//!
//! let mut a = Lcg::seed_from_u64(7);
//! let mut b = Lcg::seed_from_u64(7);
//! let xs: Vec<u32> = (0..4).map(|_| a.gen_range(0..100)).collect();
//! let ys: Vec<u32> = (0..4).map(|_| b.gen_range(0..100)).collect();
//! assert_eq!(xs, ys);
//! ```

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;

/// A 64-bit linear congruential generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Creates a generator starting from `state`.
    #[must_use]
    pub const fn new(state: u64) -> Self {
        Self { state }
    }

    /// Current internal state, for replay.
    #[must_use]
    pub const fn state(&self) -> u64 {
        self.state
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }
}

impl RngCore for Lcg {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
