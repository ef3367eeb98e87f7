//! Zipfian synthetic workload generation
//!
//! Produces the skewed key streams that make capacity-vs-hit-ratio
//! experiments meaningful: rank-`r` popularity is proportional to
//! `1 / r^alpha`, so larger `alpha` concentrates accesses on few keys.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Lazy, infinite, restartable stream of keys in `[0, key_range)`
///
/// Rank `r` (1-indexed, most popular first) maps to key `r - 1`; the rank
/// assignment is fixed per instance so a reseeded generator replays the
/// identical sequence. The cumulative distribution is precomputed once per
/// `(key_range, alpha)` and sampled by inverse transform on a uniform draw.
pub struct ZipfGenerator {
    key_range: usize,
    alpha: f64,
    cdf: Vec<f64>,
    rng: StdRng,
}

impl ZipfGenerator {
    /// Create a generator seeded from OS entropy.
    ///
    /// Fails with `InvalidConfiguration` if `key_range < 1` or `alpha` is
    /// negative or not finite.
    pub fn new(key_range: i64, alpha: f64) -> Result<Self> {
        Self::with_seed(key_range, alpha, rand::thread_rng().gen())
    }

    /// Create a generator with a fixed seed, for reproducible runs.
    pub fn with_seed(key_range: i64, alpha: f64, seed: u64) -> Result<Self> {
        if key_range < 1 {
            return Err(Error::invalid(
                "key_range",
                format!("must be at least 1, got {}", key_range),
            ));
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(Error::invalid(
                "alpha",
                format!("must be finite and non-negative, got {}", alpha),
            ));
        }

        let key_range = key_range as usize;
        Ok(Self {
            key_range,
            alpha,
            cdf: build_cdf(key_range, alpha),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Restart the sequence from a new seed; the rank assignment and
    /// distribution are unchanged.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Number of distinct keys the generator can produce
    pub fn key_range(&self) -> usize {
        self.key_range
    }

    /// Skew parameter; 0 means uniform
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Draw the next key
    pub fn next_key(&mut self) -> i64 {
        let u: f64 = self.rng.gen();
        // First rank whose cumulative probability covers the draw.
        let idx = self.cdf.partition_point(|&c| c < u);
        idx.min(self.key_range - 1) as i64
    }

    /// Materialize `n` draws into a trace, for replay across caches
    pub fn trace(&mut self, n: usize) -> Vec<i64> {
        (0..n).map(|_| self.next_key()).collect()
    }
}

impl Iterator for ZipfGenerator {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        Some(self.next_key())
    }
}

/// Cumulative probability per rank, normalized so the last entry is 1.0
fn build_cdf(key_range: usize, alpha: f64) -> Vec<f64> {
    let mut cdf = Vec::with_capacity(key_range);
    let mut acc = 0.0;
    for rank in 1..=key_range {
        acc += (rank as f64).powf(-alpha);
        cdf.push(acc);
    }
    let total = acc;
    for c in &mut cdf {
        *c /= total;
    }
    cdf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(gen: &mut ZipfGenerator, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; gen.key_range()];
        for _ in 0..draws {
            counts[gen.next_key() as usize] += 1;
        }
        counts
    }

    #[test]
    fn test_rejects_bad_key_range() {
        assert!(ZipfGenerator::new(0, 1.0).is_err());
        assert!(ZipfGenerator::new(-3, 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_alpha() {
        assert!(ZipfGenerator::new(10, -0.5).is_err());
        assert!(ZipfGenerator::new(10, f64::NAN).is_err());
        assert!(ZipfGenerator::new(10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_keys_stay_in_range() {
        let mut gen = ZipfGenerator::with_seed(7, 1.2, 42).unwrap();
        for _ in 0..10_000 {
            let key = gen.next_key();
            assert!((0..7).contains(&key));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ZipfGenerator::with_seed(100, 1.0, 7).unwrap();
        let mut b = ZipfGenerator::with_seed(100, 1.0, 7).unwrap();

        let first: Vec<i64> = a.trace(500);
        let second: Vec<i64> = b.trace(500);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut gen = ZipfGenerator::with_seed(100, 1.0, 7).unwrap();
        let first = gen.trace(200);

        gen.reseed(7);
        let replay = gen.trace(200);
        assert_eq!(first, replay);
    }

    #[test]
    fn test_skew_favors_low_keys() {
        let mut gen = ZipfGenerator::with_seed(50, 1.5, 11).unwrap();
        let counts = histogram(&mut gen, 20_000);

        // Rank 1 must dominate the tail decisively at this skew.
        assert!(counts[0] > counts[10] * 2);
        assert!(counts[0] > counts[49]);
        let top5: usize = counts[..5].iter().sum();
        assert!(top5 > 20_000 / 2);
    }

    #[test]
    fn test_alpha_zero_is_roughly_uniform() {
        let mut gen = ZipfGenerator::with_seed(10, 0.0, 3).unwrap();
        let counts = histogram(&mut gen, 50_000);

        // Expect 5000 per key; allow a generous tolerance.
        for &count in &counts {
            assert!(
                (3_500..=6_500).contains(&count),
                "uniform draw count out of band: {}",
                count
            );
        }
    }

    #[test]
    fn test_iterator_is_infinite() {
        let gen = ZipfGenerator::with_seed(5, 1.0, 0).unwrap();
        assert_eq!(gen.take(1000).count(), 1000);
    }

    #[test]
    fn test_single_key_range() {
        let mut gen = ZipfGenerator::with_seed(1, 2.0, 9).unwrap();
        for _ in 0..100 {
            assert_eq!(gen.next_key(), 0);
        }
    }
}
