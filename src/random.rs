use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 3819201;

/// A seedable random stream. Each search tree owns exactly one.
pub trait RandomGenerator: Default {
    /// Creates a stream that always produces the same sequence for the same seed.
    fn from_seed(seed: u64) -> Self;

    fn next(&mut self) -> u64;

    /// Returns a value in `from..to`.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Shuffles `items` into a uniformly random permutation.
    fn shuffle<K>(&mut self, items: &mut [K]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(0, i + 1);
            items.swap(i, j);
        }
    }

    /// Picks a uniformly random element, or `None` if `vec` is empty.
    fn get_random_from_vec<'a, K>(&mut self, vec: &'a [K]) -> Option<&'a K> {
        if vec.is_empty() {
            return None;
        }
        vec.get(self.next_range(0, vec.len()))
    }
}

/// Derives the seed of worker `index` from a base seed.
///
/// Streams of different workers are independent, and the same `(base, index)` pair always gives
/// the same seed.
pub fn derive_seed(base: u64, index: usize) -> u64 {
    // splitmix64 finalizer
    let mut z = base ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A generator backed by `rand`'s standard seeded RNG.
pub struct StandardRandomGenerator {
    rng: StdRng,
}

impl Default for StandardRandomGenerator {
    fn default() -> Self {
        StandardRandomGenerator::from_seed(DEFAULT_SEED)
    }
}

impl RandomGenerator for StandardRandomGenerator {
    fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        self.rng.random_range(from..to)
    }

    fn shuffle<K>(&mut self, items: &mut [K]) {
        items.shuffle(&mut self.rng);
    }
}

/// A tiny linear congruential generator whose output does not depend on the `rand` version.
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED as i64)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn from_seed(seed: u64) -> Self {
        // keep the state below i32::MAX so the multiplication cannot overflow
        CustomNumberGenerator::new((seed % (i32::MAX as u64)) as i64)
    }

    fn next(&mut self) -> u64 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as u64
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        (self.next() % (to - from) as u64) as usize + from
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}
