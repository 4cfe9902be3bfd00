//! DeterministicRng - Seeded Random Number Generator
//!
//! TigerStyle: ChaCha20-based RNG so delay schedules and fault rolls replay
//! exactly from a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A deterministic random number generator.
///
/// TigerStyle:
/// - Same seed always produces same sequence
/// - Fork creates independent streams
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha20Rng,
    seed: u64,
    /// Counter for generating fork seeds
    fork_counter: u64,
}

impl DeterministicRng {
    /// Create a new RNG with the given seed.
    ///
    /// # Example
    /// ```
    /// use artable_core::dst::DeterministicRng;
    /// let mut rng = DeterministicRng::new(42);
    /// let value = rng.next_float();
    /// assert!((0.0..1.0).contains(&value));
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Get the original seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random float in [0, 1).
    pub fn next_float(&mut self) -> f64 {
        let value = self.rng.gen::<f64>();

        // Postcondition
        assert!((0.0..1.0).contains(&value), "float must be in [0, 1)");
        value
    }

    /// Generate a random boolean with the given probability of true.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    pub fn next_bool(&mut self, probability: f64) -> bool {
        // Precondition
        assert!(
            (0.0..=1.0).contains(&probability),
            "probability must be in [0, 1], got {probability}"
        );

        self.next_float() < probability
    }

    /// Generate a random u64 in [0, bound).
    ///
    /// # Panics
    /// Panics if bound is zero.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        // Precondition
        assert!(bound > 0, "bound must be positive");

        let value = self.rng.gen_range(0..bound);

        // Postcondition
        assert!(value < bound, "value must be below bound");
        value
    }

    /// Create an independent fork of this RNG.
    ///
    /// Forks are derived from the parent seed, so a whole tree of generators
    /// replays from the root seed.
    pub fn fork(&mut self) -> Self {
        // Golden ratio constant spreads consecutive fork seeds apart
        let fork_seed = self.seed.wrapping_add(
            self.fork_counter
                .wrapping_add(1)
                .wrapping_mul(0x9E37_79B9_7F4A_7C15),
        );
        self.fork_counter += 1;

        Self::new(fork_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_below(100), rng2.next_below(100));
        }
    }

    #[test]
    fn test_different_seeds_different_sequence() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        let differs = (0..10).any(|_| rng1.next_float() != rng2.next_float());
        assert!(differs, "different seeds should produce different sequences");
    }

    #[test]
    fn test_next_below_bounds() {
        let mut rng = DeterministicRng::new(42);

        for _ in 0..1000 {
            assert!(rng.next_below(100) < 100);
        }
        assert_eq!(rng.next_below(1), 0);
    }

    #[test]
    fn test_next_bool_extremes() {
        let mut rng = DeterministicRng::new(42);

        for _ in 0..100 {
            assert!(!rng.next_bool(0.0));
            assert!(rng.next_bool(1.0));
        }
    }

    #[test]
    fn test_fork_independence() {
        let mut rng = DeterministicRng::new(42);

        let mut fork1 = rng.fork();
        let mut fork2 = rng.fork();

        assert_ne!(fork1.seed(), fork2.seed());

        let fork1_vals: Vec<u64> = (0..5).map(|_| fork1.next_below(1_000_000)).collect();
        let fork2_vals: Vec<u64> = (0..5).map(|_| fork2.next_below(1_000_000)).collect();
        assert_ne!(fork1_vals, fork2_vals);
    }

    #[test]
    fn test_fork_replays_from_root_seed() {
        let mut a = DeterministicRng::new(7);
        let mut b = DeterministicRng::new(7);
        assert_eq!(a.fork().seed(), b.fork().seed());
    }

    #[test]
    #[should_panic(expected = "bound must be positive")]
    fn test_next_below_zero() {
        let mut rng = DeterministicRng::new(42);
        rng.next_below(0);
    }

    #[test]
    #[should_panic(expected = "probability must be in [0, 1]")]
    fn test_next_bool_invalid_probability() {
        let mut rng = DeterministicRng::new(42);
        rng.next_bool(1.5);
    }
}
