//! Seeded randomness for world generation and enemy AI.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::helpers::Direction;

/// Wraps ChaCha8Rng so a run can be replayed from its seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Inclusive on both ends. Returns `lo` when the range is empty.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// 1..=100, the roll used by loot tables.
    pub fn percentile(&mut self) -> u32 {
        self.rng.gen_range(1..=100)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn pick<T: Copy, const N: usize>(&mut self, items: &[T; N]) -> T {
        items[self.rng.gen_range(0..N)]
    }

    pub fn direction(&mut self) -> Direction {
        self.pick(&Direction::ALL)
    }

    /// Per-axis step of -1, 0 or 1.
    pub fn erratic_heading(&mut self) -> (f32, f32) {
        let steps = [-1.0, 0.0, 1.0];
        (self.pick(&steps), self.pick(&steps))
    }

    /// Per-axis step of -1 or 1, never standing still.
    pub fn diagonal_heading(&mut self) -> (f32, f32) {
        let steps = [-1.0, 1.0];
        (self.pick(&steps), self.pick(&steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.range(60, 180);
            assert!((60..=180).contains(&n));
        }
    }

    #[test]
    fn test_percentile_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.percentile();
            assert!((1..=100).contains(&n));
        }
    }

    #[test]
    fn test_empty_ranges() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range(7, 2), 7);
        assert_eq!(rng.range_u32(3, 1), 3);
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.range(0, 100), rng2.range(0, 100));
            assert_eq!(rng1.direction(), rng2.direction());
        }
    }

    #[test]
    fn test_diagonal_heading_never_zero() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let (x, y) = rng.diagonal_heading();
            assert!(x != 0.0 && y != 0.0);
        }
    }
}
